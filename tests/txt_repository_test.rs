use tempfile::TempDir;

use dodecahedron::repositories::{Repository, TxtRepository};
use dodecahedron::wrappers::TxtFile;

fn repository_in(dir: &TempDir) -> TxtRepository {
    let file = TxtFile::new(dir.path().join("log.txt")).unwrap();
    TxtRepository::new(file)
}

#[test]
fn test_commit_writes_one_record_per_line() {
    let dir = TempDir::new().unwrap();

    let mut repository = repository_in(&dir);
    repository.add("first entry".to_string()).unwrap();
    repository.add("second entry".to_string()).unwrap();
    repository.commit().unwrap();

    let contents = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert_eq!(contents, "first entry\nsecond entry\n");
}

#[test]
fn test_lines_are_their_own_references() {
    let dir = TempDir::new().unwrap();

    let mut repository = repository_in(&dir);
    repository.add("first entry".to_string()).unwrap();

    assert_eq!(
        repository.get("first entry").unwrap(),
        Some("first entry".to_string())
    );
    assert_eq!(repository.get("missing").unwrap(), None);
}

#[test]
fn test_add_rejects_duplicate_lines() {
    let dir = TempDir::new().unwrap();

    let mut repository = repository_in(&dir);
    repository.add("first entry".to_string()).unwrap();
    assert!(repository.add("first entry".to_string()).is_err());
}

#[test]
fn test_rollback_restores_state_on_disk() {
    let dir = TempDir::new().unwrap();

    let mut repository = repository_in(&dir);
    repository.add("kept".to_string()).unwrap();
    repository.commit().unwrap();

    repository.add("discarded".to_string()).unwrap();
    repository.rollback().unwrap();

    assert_eq!(repository.list().unwrap(), vec!["kept".to_string()]);
}

#[test]
fn test_remove_drops_line_on_commit() {
    let dir = TempDir::new().unwrap();

    let mut repository = repository_in(&dir);
    repository.add("first entry".to_string()).unwrap();
    repository.add("second entry".to_string()).unwrap();
    repository.remove("first entry").unwrap();
    repository.commit().unwrap();

    let contents = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert_eq!(contents, "second entry\n");
}
