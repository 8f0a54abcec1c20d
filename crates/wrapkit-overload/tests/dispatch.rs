//! Planning whole classes against a hierarchy

use wrapkit_ast::{BaseType, ClassDescriptor, MethodDescriptor, ParamDesc, TypeDesc};
use wrapkit_hierarchy::{Database, DatabaseBuilder};
use wrapkit_overload::{plan_class, ArgKind, ArgSlot, DispatchKind, EliminationReason, OverloadSettings};

const HIERARCHY: &str = "\
vtkIdType = long long ; vtkType.h ; vtkCommonCore
vtkObject ; vtkObject.h ; vtkCommonCore
vtkDataObject : vtkObject ; vtkDataObject.h ; vtkCommonDataModel
vtkPolyData : vtkDataObject ; vtkPolyData.h ; vtkCommonDataModel
vtkInternals ; vtkInternals.h ; vtkCommonCore ; WRAP_EXCLUDE
vtkFilter : vtkObject ; vtkFilter.h ; vtkCommonExecutionModel
vtkFilter::Mode : enum ; vtkFilter.h ; vtkCommonExecutionModel
";

fn make_db() -> Database {
    let mut builder = DatabaseBuilder::new();
    builder.load_str("hierarchy.txt", HIERARCHY).unwrap();
    builder.build()
}

fn scalar(base: BaseType) -> TypeDesc {
    TypeDesc::scalar(base)
}

fn make_filter() -> ClassDescriptor {
    ClassDescriptor::new("vtkFilter")
        .superclass("vtkObject")
        .method(MethodDescriptor::new("vtkFilter"))
        .method(MethodDescriptor::new("SetScale").param(scalar(BaseType::Float)))
        .method(MethodDescriptor::new("SetScale").param(scalar(BaseType::Double)))
        .method(MethodDescriptor::new("Resize"))
        .method(
            MethodDescriptor::new("Resize")
                .param(scalar(BaseType::Int))
                .param_desc(ParamDesc::new(scalar(BaseType::Int)).with_default("0")),
        )
        .method(MethodDescriptor::new("SetInput").param(TypeDesc::object("vtkDataObject").pointer()))
        .method(MethodDescriptor::new("SetInput").param(scalar(BaseType::Int)))
        .method(
            MethodDescriptor::new("SetMode").param(TypeDesc::named(BaseType::Unknown, "Mode")),
        )
        .method(
            MethodDescriptor::new("SetPieceCount").param(TypeDesc::named(BaseType::Unknown, "vtkIdType")),
        )
        .method(MethodDescriptor::new("GetInternals").returns(TypeDesc::object("vtkInternals").pointer()))
        .method(
            MethodDescriptor::new("GetBounds")
                .const_method()
                .returns(scalar(BaseType::Double).pointer()),
        )
}

#[test]
fn test_precedence_and_arity_map() {
    let db = make_db();
    let plan = plan_class(&make_filter(), Some(&db), &OverloadSettings::default());

    let scale = plan.group("SetScale").unwrap();
    assert_eq!(scale.signatures.len(), 1);
    assert_eq!(scale.signatures[0].type_check, "@d");
    assert_eq!(scale.eliminated[0].method, 1);
    assert_eq!(scale.eliminated[0].reason, EliminationReason::Precedence);
    assert_eq!(scale.plan.kind, DispatchKind::Direct);

    let resize = plan.group("Resize").unwrap();
    assert_eq!(
        resize.plan.arg_map,
        vec![ArgSlot::Unique(0), ArgSlot::Unique(1), ArgSlot::Unique(1)]
    );
    assert_eq!(resize.plan.kind, DispatchKind::Master);
}

#[test]
fn test_collision_resolved_by_ancestry() {
    let db = make_db();
    let plan = plan_class(&make_filter(), Some(&db), &OverloadSettings::default());
    let input = plan.group("SetInput").unwrap();

    assert_eq!(input.plan.arg_map[1], ArgSlot::Collision(vec![0, 1]));
    assert_eq!(input.plan.checks, vec!["@V *vtkDataObject", "@i"]);

    let poly = [ArgKind::Object("vtkPolyData".into())];
    assert_eq!(input.plan.select_with(&poly, Some(&db)), Ok(0));
    assert!(input.plan.select(&poly).is_err());
    assert_eq!(input.plan.select(&[ArgKind::None]), Ok(0));
    assert_eq!(input.plan.select(&[ArgKind::Int]), Ok(1));

    let err = input.plan.select(&[ArgKind::Int, ArgKind::Int]).unwrap_err();
    assert_eq!(err.code(), "E-DISPATCH-001");
}

#[test]
fn test_typedefs_and_enums_expanded() {
    let db = make_db();
    let plan = plan_class(&make_filter(), Some(&db), &OverloadSettings::default());

    assert_eq!(plan.group("SetMode").unwrap().plan.checks, vec!["@E vtkFilter::Mode"]);
    assert_eq!(plan.group("SetPieceCount").unwrap().plan.checks, vec!["@L"]);
}

#[test]
fn test_unwrappable_methods_reported() {
    let db = make_db();
    let plan = plan_class(&make_filter(), Some(&db), &OverloadSettings::default());

    let skipped: Vec<(&str, &str)> = plan
        .skipped
        .iter()
        .map(|s| (s.name.as_str(), s.reason.code()))
        .collect();
    assert_eq!(
        skipped,
        vec![("GetInternals", "S-OVL-013"), ("GetBounds", "S-OVL-011")]
    );

    // Without a hierarchy the exclusion flag is invisible
    let plan = plan_class(&make_filter(), None, &OverloadSettings::default());
    assert!(plan.group("GetInternals").is_some());
}

#[test]
fn test_plan_serializes() {
    let db = make_db();
    let plan = plan_class(&make_filter(), Some(&db), &OverloadSettings::default());
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["class_name"], "vtkFilter");
    let resize = &json["groups"][2];
    assert_eq!(resize["name"], "Resize");
    assert_eq!(resize["plan"]["kind"], "master");
    assert_eq!(resize["plan"]["arg_map"][0]["kind"], "unique");
    assert_eq!(resize["plan"]["arg_map"][0]["signatures"], 0);
    assert_eq!(json["skipped"][0]["reason"]["reason"], "excluded");
}
