#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    use proptest::prelude::*;
    use tempfile::TempDir;
    use encdata_core::{
        constants::{DEFAULT_ALLOWED_SUFFIXES, MANIFEST_FILE_NAME},
        dataset::{DatasetIndex, Item, ItemKind},
        types::DatasetError,
    };

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }

    fn names(index: &DatasetIndex) -> Vec<String> {
        index.iter().map(Item::file_name).collect()
    }

    #[test]
    fn discover_filters_by_suffix_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["c.png", "a.jpeg.enc", "b.JPG", "notes.txt", "d.gif"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.enc")).unwrap();

        let index = DatasetIndex::discover(dir.path(), DEFAULT_ALLOWED_SUFFIXES).unwrap();
        assert_eq!(names(&index), ["a.jpeg.enc", "b.JPG", "c.png"]);
        assert_eq!(index.item(0).unwrap().kind, ItemKind::Encrypted);
        assert_eq!(index.item(1).unwrap().kind, ItemKind::Plain);

        for (i, item) in index.iter().enumerate() {
            assert_eq!(item.index, i);
        }
    }

    #[test]
    fn suffixes_accept_leading_dot() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.enc");
        let index = DatasetIndex::discover(dir.path(), &[".ENC"]).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn manifest_decides_membership_and_order() {
        let dir = TempDir::new().unwrap();
        for name in ["a.enc", "b.enc", "c.enc"] {
            touch(dir.path(), name);
        }
        fs::write(dir.path().join(MANIFEST_FILE_NAME), "c.enc\n\n a.enc \n").unwrap();

        let index = DatasetIndex::discover(dir.path(), DEFAULT_ALLOWED_SUFFIXES).unwrap();
        assert_eq!(names(&index), ["c.enc", "a.enc"]);
    }

    #[test]
    fn manifest_entry_must_exist() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.enc");
        fs::write(dir.path().join(MANIFEST_FILE_NAME), "a.enc\nmissing.enc\n").unwrap();

        let err = DatasetIndex::discover(dir.path(), DEFAULT_ALLOWED_SUFFIXES).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }), "{err}");
        assert!(err.path().unwrap().ends_with("missing.enc"));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DatasetIndex::discover(&dir.path().join("nope"), DEFAULT_ALLOWED_SUFFIXES).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn empty_directory_is_empty_index() {
        let dir = TempDir::new().unwrap();
        let index = DatasetIndex::discover(dir.path(), DEFAULT_ALLOWED_SUFFIXES).unwrap();
        assert!(index.is_empty());
        assert!(index.first_encrypted().is_none());
        assert!(matches!(index.item(0), Err(DatasetError::IndexOutOfRange { index: 0, len: 0 })));
    }

    #[test]
    fn exclude_removes_and_renumbers() {
        let mut index = DatasetIndex::from_paths(Path::new("/d"), ["/d/a.enc", "/d/b.enc", "/d/c.enc"]);
        let blacklist: HashSet<String> = ["b.enc".to_string(), "zzz.enc".to_string()].into();

        assert_eq!(index.exclude(&blacklist), 1);
        assert_eq!(names(&index), ["a.enc", "c.enc"]);
        assert_eq!(index.item(1).unwrap().index, 1);
        assert_eq!(index.file_name(1).unwrap(), "c.enc");
    }

    #[test]
    fn first_encrypted_skips_plain_items() {
        let index = DatasetIndex::from_paths(Path::new("/d"), ["/d/a.png", "/d/b.enc"]);
        assert_eq!(index.first_encrypted().unwrap().file_name(), "b.enc");
    }

    #[test]
    fn shuffle_is_a_reproducible_permutation() {
        let paths: Vec<String> = (0..20).map(|i| format!("/d/{i:02}.enc")).collect();
        let mut a = DatasetIndex::from_paths(Path::new("/d"), paths.clone());
        let mut b = DatasetIndex::from_paths(Path::new("/d"), paths.clone());

        let perm_a = a.shuffle(1729);
        let perm_b = b.shuffle(1729);
        assert_eq!(perm_a, perm_b);
        assert_eq!(names(&a), names(&b));

        for (new, &old) in perm_a.iter().enumerate() {
            assert_eq!(a.item(new).unwrap().path.to_string_lossy(), paths[old]);
            assert_eq!(a.item(new).unwrap().index, new);
        }
    }

    proptest! {
        #[test]
        fn prop_shuffle_keeps_every_item(n in 0usize..64, seed in any::<u64>()) {
            let paths: Vec<String> = (0..n).map(|i| format!("/d/{i}.enc")).collect();
            let mut index = DatasetIndex::from_paths(Path::new("/d"), paths);
            let before: HashSet<String> = names(&index).into_iter().collect();

            let mut perm = index.shuffle(seed);
            let after: HashSet<String> = names(&index).into_iter().collect();
            prop_assert_eq!(before, after);

            perm.sort_unstable();
            prop_assert_eq!(perm, (0..n).collect::<Vec<_>>());
        }
    }
}
