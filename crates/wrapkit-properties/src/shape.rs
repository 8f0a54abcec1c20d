//! Method shapes: the structural role a method plays for a property

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// One bit per recognized method shape. A property accumulates the
    /// shapes of every method attached to it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MethodShape: u32 {
        /// `T GetX()`
        const GET = 1 << 0;
        /// `void SetX(T)`
        const SET = 1 << 1;
        /// `void GetX(T&)` or `void GetX(T[n])`
        const GET_RHS = 1 << 2;
        /// `T GetX(int i)`
        const GET_IDX = 1 << 3;
        /// `void SetX(int i, T)`
        const SET_IDX = 1 << 4;
        /// `T GetNthX(int i)`
        const GET_NTH = 1 << 5;
        /// `void SetNthX(int i, T)`
        const SET_NTH = 1 << 6;
        /// `void GetX(T&, T&, T&)`
        const GET_MULTI = 1 << 7;
        /// `void SetX(T, T, T)`
        const SET_MULTI = 1 << 8;
        /// `const char *GetXAsString()`
        const GET_AS_STRING = 1 << 9;
        /// `T GetXMinValue()`
        const GET_MIN_VALUE = 1 << 10;
        /// `T GetXMaxValue()`
        const GET_MAX_VALUE = 1 << 11;
        /// `void XOn()`
        const BOOL_ON = 1 << 12;
        /// `void XOff()`
        const BOOL_OFF = 1 << 13;
        /// `void SetXToLiteral()`
        const ENUM_SET = 1 << 14;
        /// `int GetNumberOfXs()`
        const GET_NUM = 1 << 15;
        /// `void SetNumberOfXs(int)`
        const SET_NUM = 1 << 16;
        /// `void AddX(T)`
        const ADD = 1 << 17;
        /// `void AddX(int i, T)`
        const ADD_IDX = 1 << 18;
        /// `void AddX(T, T, T)`
        const ADD_MULTI = 1 << 19;
        /// `int AddX(T)`: the result reports success
        const ADD_NODISCARD = 1 << 20;
        /// `void RemoveX(T)`
        const REMOVE = 1 << 21;
        /// `void RemoveX(int i)`
        const REMOVE_IDX = 1 << 22;
        /// `int RemoveX(T)`
        const REMOVE_NODISCARD = 1 << 23;
        /// `void RemoveAllXs()`
        const REMOVE_ALL = 1 << 24;

        const ANY_SETTER = Self::SET.bits() | Self::SET_IDX.bits() | Self::SET_NTH.bits()
            | Self::SET_MULTI.bits();
        const ANY_GETTER = Self::GET.bits() | Self::GET_RHS.bits() | Self::GET_IDX.bits()
            | Self::GET_NTH.bits() | Self::GET_MULTI.bits();
        const ANY_ADD = Self::ADD.bits() | Self::ADD_IDX.bits() | Self::ADD_MULTI.bits()
            | Self::ADD_NODISCARD.bits();
        const ANY_BOOL = Self::BOOL_ON.bits() | Self::BOOL_OFF.bits();
        /// Shapes matched to a property by name alone
        const NAME_ONLY = Self::GET_NUM.bits() | Self::SET_NUM.bits()
            | Self::GET_AS_STRING.bits() | Self::REMOVE_IDX.bits() | Self::REMOVE_ALL.bits();
    }
}

impl MethodShape {
    /// Names of the set bits, e.g. `["GET", "SET"]`
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}
