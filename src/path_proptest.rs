//! Property-based tests for path classification, destination mapping and
//! validation of on-disk resource trees.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::duplicates::DuplicateIndex;
    use crate::error::Error;
    use crate::locale::is_known_locale;
    use crate::overlay::{OverlayResolver, Variant};
    use crate::path::{climb_up_to, depth, is_direct_child_of, relative_to};
    use crate::validate::{classify, Category, Validator, PRODUCT_EXTENSION};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,12}".prop_filter("no relative markers", |s| s != "." && s != "..")
    }

    fn relative_path() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec(segment(), 1..6)
            .prop_map(|parts| parts.iter().collect::<PathBuf>())
    }

    /// A segment that is not itself a category root name.
    fn plain_segment() -> impl Strategy<Value = String> {
        segment().prop_filter("not a category root", |s| {
            s != "listings" && s != "release-notes" && s != "products"
        })
    }

    fn resolver_at<P: Into<PathBuf>>(project: P) -> OverlayResolver {
        let variant = Variant::new(
            "demo-full-release",
            ["main", "demo", "full", "demoFull", "release"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        OverlayResolver::new(project, "play", variant)
    }

    fn resolver() -> OverlayResolver {
        resolver_at("/project")
    }

    fn write(project: &Path, rel: &Path) -> PathBuf {
        let path = project.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "content").unwrap();
        path
    }

    // ============================================================================
    // climb_up_to property tests
    // ============================================================================

    proptest! {
        /// Property: a found ancestor is a prefix of the input and carries the name
        #[test]
        fn climb_up_to_returns_named_prefix(path in relative_path(), name in segment()) {
            if let Some(found) = climb_up_to(&path, &name) {
                prop_assert!(path.starts_with(found));
                prop_assert_eq!(found.file_name().unwrap().to_str().unwrap(), name.as_str());
            }
        }

        /// Property: climb_up_to finds a name whenever one of the components has it
        #[test]
        fn climb_up_to_is_total_and_complete(path in relative_path(), name in segment()) {
            let present = path.components().any(|c| c.as_os_str() == name.as_str());
            prop_assert_eq!(climb_up_to(&path, &name).is_some(), present);
        }

        /// Property: the found ancestor is the nearest one
        #[test]
        fn climb_up_to_finds_nearest(path in relative_path(), name in segment()) {
            if let Some(found) = climb_up_to(&path, &name) {
                let rest = path.strip_prefix(found).unwrap();
                prop_assert!(rest.components().all(|c| c.as_os_str() != name.as_str()));
            }
        }
    }

    // ============================================================================
    // classification property tests
    // ============================================================================

    proptest! {
        /// Property: every direct child of a root is classified
        #[test]
        fn direct_children_are_never_unknown(name in segment()) {
            prop_assert!(classify(Path::new(&name)).is_some());
        }

        /// Property: a generic classification only happens for direct children
        #[test]
        fn generic_means_depth_one(path in relative_path()) {
            if let Some(c) = classify(&path) {
                if c.category == Category::Generic {
                    prop_assert_eq!(depth(&path), 1);
                }
            }
        }

        /// Property: anything under a top-level listings root is a listing
        #[test]
        fn listings_prefix_is_listing(rest in relative_path()) {
            let rest_has_category = rest.components().any(|c| {
                let c = c.as_os_str();
                c == "listings" || c == "release-notes" || c == "products"
            });
            prop_assume!(!rest_has_category);
            let path = Path::new("listings").join(&rest);
            let c = classify(&path).unwrap();
            prop_assert_eq!(c.category, Category::Listing);
            prop_assert_eq!(c.category_root, Some(Path::new("listings")));
        }
    }

    // ============================================================================
    // destination mapping property tests
    // ============================================================================

    proptest! {
        /// Property: destination mapping is injective within one overlay
        #[test]
        fn destination_is_injective_per_overlay(a in relative_path(), b in relative_path()) {
            prop_assume!(a != b);
            let resolver = resolver();
            let root = Path::new("/project/src/demo/play");
            let (pa, pb) = (root.join(&a), root.join(&b));
            prop_assert_ne!(
                resolver.destination(&pa).unwrap(),
                resolver.destination(&pb).unwrap()
            );
        }

        /// Property: destination is the path relative to the owning root, for every root
        #[test]
        fn destination_round_trips_through_owner(rel in relative_path(), index in 0usize..5) {
            let resolver = resolver();
            let root = resolver.roots()[index].path.clone();
            let file = root.join(&rel);
            prop_assert_eq!(&resolver.owner(&file).unwrap().path, &root);
            prop_assert_eq!(resolver.destination(&file).unwrap(), rel.as_path());
            prop_assert_eq!(relative_to(&file, &root), Some(rel.as_path()));
        }

        /// Property: only direct children of a root satisfy is_direct_child_of
        #[test]
        fn direct_child_matches_depth(rel in relative_path()) {
            let root = Path::new("/project/src/main/play");
            prop_assert_eq!(is_direct_child_of(&root.join(&rel), root), depth(&rel) == 1);
        }
    }

    // ============================================================================
    // on-disk validation property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: any non-locale directory under listings or release-notes is rejected
        #[test]
        fn invalid_locale_names_are_rejected(
            name in plain_segment().prop_filter("not a locale", |n| !is_known_locale(n)),
            category in prop_oneof![Just("listings"), Just("release-notes")],
        ) {
            let temp = TempDir::new().unwrap();
            let rel = Path::new("src/main/play").join(category).join(&name).join("a.txt");
            let file = write(temp.path(), &rel);
            let resolver = resolver_at(temp.path());

            let err = Validator::new(&resolver).validate(&file).unwrap_err();
            prop_assert!(
                matches!(err, Error::InvalidLocale { name: ref found, .. } if *found == name),
                "unexpected error: {:?}",
                err
            );
        }

        /// Property: any product file without the json extension is rejected
        #[test]
        fn non_json_products_are_rejected(
            stem in "[a-z0-9_]{1,10}",
            ext in "[a-zA-Z0-9]{1,5}".prop_filter("not json", |e| e != PRODUCT_EXTENSION),
        ) {
            let temp = TempDir::new().unwrap();
            let name = format!("{}.{}", stem, ext);
            let file = write(temp.path(), &Path::new("src/main/play/products").join(&name));
            let resolver = resolver_at(temp.path());

            let err = Validator::new(&resolver).validate(&file).unwrap_err();
            prop_assert!(
                matches!(err, Error::InvalidProductFile { name: ref found } if *found == name),
                "unexpected error: {:?}",
                err
            );
        }

        /// Property: any relative path present in two sibling flavors is a conflict
        #[test]
        fn shared_flavor_path_is_indexed_as_conflict(rel in relative_path()) {
            let temp = TempDir::new().unwrap();
            let demo_file = write(temp.path(), &Path::new("src/demo/play").join(&rel));
            write(temp.path(), &Path::new("src/full/play").join(&rel));
            let resolver = resolver_at(temp.path());

            let index = DuplicateIndex::build(&resolver).unwrap();
            prop_assert_eq!(index.conflict_for(&resolver.roots()[1], &demo_file), Some("full"));
        }

        /// Property: a valid resource shared by two sibling flavors fails validation
        #[test]
        fn shared_flavor_resource_is_duplicate(
            leaf in plain_segment(),
            listing in any::<bool>(),
        ) {
            let rel = if listing {
                Path::new("listings/en-US").join(&leaf)
            } else {
                PathBuf::from(&leaf)
            };
            let temp = TempDir::new().unwrap();
            let demo_file = write(temp.path(), &Path::new("src/demo/play").join(&rel));
            write(temp.path(), &Path::new("src/full/play").join(&rel));
            let resolver = resolver_at(temp.path());

            let err = Validator::new(&resolver).validate(&demo_file).unwrap_err();
            prop_assert!(
                matches!(err, Error::DuplicateFlavorFile { ref flavor, ref path } if flavor == "full" && *path == demo_file),
                "unexpected error: {:?}",
                err
            );
        }
    }
}
