//! Integration tests for the flat identifier codec and folder grouping.

use geoface_path::codec::{PathCodec, StructuredPath, UNKNOWN_LABEL};
use geoface_path::grouping::{FolderGrouping, ROOT_KEY};
use geoface_path::HierarchyBuilder;

const NCD_ID: &str = "PNG:NATIONAL_CAPITAL_DISTRICT:MORESBY_NORTH-EAST:130168379_Soare_Nuana_F.jpg";

#[test]
fn test_encode_decode_registration_path() {
    let path = StructuredPath::new([
        "PNG",
        "NATIONAL CAPITAL DISTRICT",
        "MORESBY NORTH-EAST",
        "130168379_Soare_Nuana_F.jpg",
    ])
    .unwrap();

    let id = PathCodec::encode(&path);
    assert_eq!(id, NCD_ID);
    assert!(PathCodec::is_valid_flat_identifier(&id));
    assert_eq!(PathCodec::decode(&id), Some(path));
}

#[test]
fn test_leaf_labels() {
    assert_eq!(PathCodec::extract_leaf_display_name(NCD_ID), "Soare Nuana F");
    assert_eq!(PathCodec::extract_leaf_display_name("Soare_Nuana.jpg"), "Soare Nuana");
    assert_eq!(PathCodec::extract_leaf_display_name("PNG:"), UNKNOWN_LABEL);
    assert_eq!(
        PathCodec::extract_folder_prefix(NCD_ID),
        "PNG/NATIONAL CAPITAL DISTRICT/MORESBY NORTH-EAST"
    );
}

#[test]
fn test_underscore_in_folder_name_is_lossy() {
    let path = StructuredPath::new(["WEST_SEPIK", "photo.jpg"]).unwrap();
    let decoded = PathCodec::decode(&PathCodec::encode(&path)).unwrap();
    assert_eq!(decoded.folders(), ["WEST SEPIK".to_string()]);
    assert_eq!(decoded.leaf(), "photo.jpg");
}

#[test]
fn test_builder_and_grouping_agree() {
    let ids = ["A:B:f1.jpg", "A:B:f2.jpg", "A:C:f3.jpg"];

    let tree = HierarchyBuilder::build(ids);
    let a = tree.root.find("A").unwrap();
    assert_eq!(
        a.children.values().map(|c| c.key.as_str()).collect::<Vec<_>>(),
        vec!["A:B", "A:C"]
    );
    assert_eq!(tree.root.find("A:B").unwrap().items.len(), 2);
    assert_eq!(tree.root.find("A:C").unwrap().items.len(), 1);

    let map = FolderGrouping::group_by_folder(ids);
    assert_eq!(map.get("A").unwrap().child_keys, vec!["A:B", "A:C"]);
    assert_eq!(map.get("A:B").unwrap().items.len(), 2);
    assert_eq!(map.total_items(), 3);
}

#[test]
fn test_grouping_navigation() {
    let map = FolderGrouping::group_by_folder([
        NCD_ID,
        "PNG:NATIONAL_CAPITAL_DISTRICT:MORESBY_SOUTH:130168380_Kila_Aru_M.jpg",
        "PNG:CENTRAL:ABAU:130168381_Mea_Kila_F.jpg",
        "::broken",
    ]);

    assert_eq!(map.skipped, 1);
    let root = map.root().unwrap();
    assert_eq!(root.child_keys, vec!["PNG"]);

    let ncd = map.get("PNG:NATIONAL_CAPITAL_DISTRICT").unwrap();
    assert_eq!(ncd.display_path, "PNG/NATIONAL CAPITAL DISTRICT");
    let names: Vec<&str> = map
        .subfolders("PNG:NATIONAL_CAPITAL_DISTRICT")
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["MORESBY NORTH-EAST", "MORESBY SOUTH"]);

    let crumbs = map.breadcrumbs("PNG:CENTRAL:ABAU");
    assert_eq!(crumbs.first().map(|c| c.0.as_str()), Some(ROOT_KEY));
    assert_eq!(
        crumbs.iter().skip(1).map(|c| c.1.as_str()).collect::<Vec<_>>(),
        vec!["PNG", "CENTRAL", "ABAU"]
    );

    let abau = map.get("PNG:CENTRAL:ABAU").unwrap();
    assert_eq!(abau.items[0].display_name, "Mea Kila F");
}

#[test]
fn test_grouping_empty_input() {
    let map = FolderGrouping::group_by_folder(Vec::<String>::new());
    assert!(map.is_empty());
    assert!(map.root().is_none());
}
