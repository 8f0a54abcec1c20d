//! End-to-end tests: fixture hierarchy plus class descriptions, through
//! property synthesis and overload planning

mod common;

use common::assertions::{assert_property, assert_skipped, assert_type_checks};
use common::fixtures::{fixture_path, load_class, load_hierarchy};

use wrapkit::ast::BaseType;
use wrapkit::hierarchy::DatabaseBuilder;
use wrapkit::overload::{plan_class, ArgKind, ArgSlot, OverloadSettings};
use wrapkit::properties::{MethodShape, PropertyOptions, PropertySynthesizer};

#[test]
fn e2e_hierarchy_loads_cleanly() {
    let db = load_hierarchy();
    let summary = db.summary();

    assert_eq!(summary.entities, 18);
    assert_eq!(summary.classes, 15);
    assert_eq!(summary.typedefs, 2);
    assert_eq!(summary.enums, 1);
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);

    assert!(db.find_entry("vtkSphereSource").is_some_and(|e| e.is_primary()));
    assert!(db.is_excluded("vtkInformation", "WRAP_EXCLUDE"));
}

#[test]
fn e2e_ancestry_across_sources() {
    let db = load_hierarchy();

    assert_eq!(db.is_a("vtkSphereSource", "vtkObject").as_deref(), Some("vtkObject"));
    assert_eq!(
        db.is_a("vtkVector3d", "vtkTuple").as_deref(),
        Some("vtkTuple<double, 3>")
    );
    assert_eq!(
        db.is_a("vtkVector3<int>", "vtkVector").as_deref(),
        Some("vtkVector<int, 3>")
    );
    assert_eq!(db.is_a("vtkPolyData", "vtkAlgorithm"), None);
    assert_eq!(db.is_a("vtkUnknownThing", "vtkObject"), None);
}

#[test]
fn e2e_broken_source_is_not_merged() {
    let mut builder = DatabaseBuilder::new();
    let report = builder.load_dir(fixture_path("broken")).unwrap();
    assert_eq!(report.sources, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].code(), "E-HIER-004");

    let db = builder.build();
    assert!(db.find_entry("vtkFine").is_none());
}

#[test]
fn e2e_sphere_source_properties() {
    let db = load_hierarchy();
    let class = load_class("vtkSphereSource");
    let result = PropertySynthesizer::new(&PropertyOptions::default())
        .with_database(&db)
        .synthesize(&class);

    assert_property(
        &result,
        "Radius",
        MethodShape::SET | MethodShape::GET | MethodShape::GET_MIN_VALUE | MethodShape::GET_MAX_VALUE,
    );
    let center = assert_property(
        &result,
        "Center",
        MethodShape::SET | MethodShape::SET_MULTI | MethodShape::GET,
    );
    assert_eq!(center.value.as_ref().and_then(|v| v.count), Some(3));

    let tessellation = assert_property(
        &result,
        "LatLongTessellation",
        MethodShape::SET | MethodShape::GET | MethodShape::BOOL_ON | MethodShape::BOOL_OFF,
    );
    assert_eq!(tessellation.value.as_ref().map(|v| v.base), Some(BaseType::Int));

    let precision = assert_property(&result, "OutputPrecision", MethodShape::SET | MethodShape::GET);
    let value = precision.value.as_ref().unwrap();
    assert_eq!(value.base, BaseType::Enum);
    assert_eq!(value.class_name.as_deref(), Some("vtkAlgorithm::DesiredOutputPrecision"));

    assert_property(&result, "Output", MethodShape::GET);
    assert_eq!(result.properties.len(), 6);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let unclassified: Vec<&str> = result
        .unclassified
        .iter()
        .map(|&i| class.methods[i].name.as_str())
        .collect();
    assert_eq!(unclassified, vec!["New", "Update", "Update"]);
}

#[test]
fn e2e_sphere_source_dispatch() {
    let db = load_hierarchy();
    let class = load_class("vtkSphereSource");
    let plan = plan_class(&class, Some(&db), &OverloadSettings::default());

    assert_skipped(
        &plan,
        &[
            ("vtkSphereSource", "S-OVL-002"),
            ("New", "S-OVL-004"),
            ("GetInformation", "S-OVL-013"),
            ("RequestData", "S-OVL-002"),
        ],
    );
    assert_eq!(plan.groups.len(), 14);

    let center = assert_type_checks(&plan, "SetCenter", &["@ddd", "@Pd"]);
    assert_eq!(
        center.plan.arg_map,
        vec![ArgSlot::Empty, ArgSlot::Unique(1), ArgSlot::Empty, ArgSlot::Unique(0)]
    );
    assert_eq!(
        center.plan.select(&[ArgKind::Float, ArgKind::Int, ArgKind::Float]),
        Ok(0)
    );
    let err = center.plan.select(&[ArgKind::Float, ArgKind::Float]).unwrap_err();
    assert_eq!(err.to_string(), "SetCenter() takes 1 to 3 arguments (2 given)");

    assert_type_checks(&plan, "SetLatLongTessellation", &["@i"]);
    assert_type_checks(
        &plan,
        "SetOutputPrecision",
        &["@E vtkAlgorithm::DesiredOutputPrecision"],
    );
    assert_type_checks(&plan, "Update", &["@", "@i"]);

    let radius = plan.group("SetRadius").unwrap();
    assert_eq!(
        radius.doc,
        "V.SetRadius(float)\nC++: virtual void SetRadius(double radius)\n\nSet radius of sphere. Default is 0.5."
    );
}

#[test]
fn e2e_plans_are_independent_per_class() {
    let db = load_hierarchy();
    let class = load_class("vtkSphereSource");
    let settings = OverloadSettings::default();

    let first = plan_class(&class, Some(&db), &settings);
    let plans: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| plan_class(&class, Some(&db), &settings)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for plan in plans {
        assert_eq!(plan, first);
    }
}
