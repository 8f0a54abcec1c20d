use wrapkit_overload::{ClassPlan, OverloadGroup};
use wrapkit_properties::{ClassProperties, MethodShape, PropertyDescriptor};

/// Assert a property exists and has at least the given accessor shapes
pub fn assert_property<'a>(
    result: &'a ClassProperties,
    name: &str,
    shapes: MethodShape,
) -> &'a PropertyDescriptor {
    let property = result
        .find(name)
        .unwrap_or_else(|| panic!("Expected property: {}", name));
    assert!(
        property.has(shapes),
        "Property {} has {:?}, expected at least {:?}",
        name,
        property.shapes(),
        shapes
    );
    property
}

/// Assert an overload group exists with exactly these type-check strings
pub fn assert_type_checks<'a>(plan: &'a ClassPlan, name: &str, checks: &[&str]) -> &'a OverloadGroup {
    let group = plan
        .group(name)
        .unwrap_or_else(|| panic!("Expected overload group: {}", name));
    assert_eq!(group.plan.checks, checks, "type-check strings of {}", name);
    group
}

/// Assert the skipped methods, by name and reason code, in order
pub fn assert_skipped(plan: &ClassPlan, expected: &[(&str, &str)]) {
    let skipped: Vec<(&str, &str)> = plan
        .skipped
        .iter()
        .map(|s| (s.name.as_str(), s.reason.code()))
        .collect();
    assert_eq!(skipped, expected);
}
