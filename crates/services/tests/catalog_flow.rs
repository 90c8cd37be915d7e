use std::fs;
use std::path::Path;
use std::sync::Arc;

use catalog_core::filter::{DifficultyFilter, SortOrder};
use catalog_core::model::{Difficulty, LessonId, TagName};
use catalog_core::time::fixed_clock;
use catalog_core::{ItemKind, ProgressPercent};
use serde_json::{Value, json};
use services::{
    AppServices, CatalogConfig, ContentLoadError, FsContentSource, InMemoryContentSource,
    course_page, lesson_page,
};

fn write_json(root: &Path, relative: &str, value: &Value) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
    fs::write(path, value.to_string()).expect("write json");
}

fn seed_site(root: &Path) {
    write_json(
        root,
        "content/courses.json",
        &json!({ "courses": [
            {
                "id": "python",
                "title": "Python Basics",
                "description": "Variables, loops and functions",
                "difficulty": "Beginner",
                "category": "Programming",
                "tags": ["python"],
                "createdAt": "2024-06-01",
                "estimatedMinutes": 90,
                "modules": [
                    { "title": "Getting started", "lessons": ["variables", "loops"] }
                ]
            },
            {
                "id": "cooking",
                "title": "Home Cooking",
                "description": "Kitchen fundamentals",
                "difficulty": "Advanced",
                "category": "Cooking",
                "modules": [
                    { "title": "Knives", "lessons": ["knife-skills", "renamed"] }
                ]
            }
        ]}),
    );
    write_json(
        root,
        "content/lessons/variables.json",
        &json!({ "id": "variables", "title": "Variables", "tags": ["python", "basics"],
                 "durationMinutes": 15,
                 "sections": [{ "title": "Names & Values", "body": "Assign with =" }] }),
    );
    write_json(
        root,
        "content/lessons/loops.json",
        &json!({ "id": "loops", "title": "Loops", "tags": ["python"],
                 "difficulty": "Intermediate" }),
    );
    write_json(
        root,
        "content/lessons/knife-skills.json",
        &json!({ "id": "knife-skills", "title": "Knife Skills", "tags": ["knives"] }),
    );
    // The document id differs from the reference, so the reference dangles.
    write_json(
        root,
        "content/lessons/renamed.json",
        &json!({ "id": "something-else", "title": "Elsewhere" }),
    );
}

async fn services_for(root: &Path) -> AppServices {
    let config = CatalogConfig::from_values(root.to_str(), Some("memory")).expect("config");
    AppServices::new(&config, fixed_clock()).await.expect("services")
}

#[tokio::test]
async fn dangling_references_produce_no_items() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_site(dir.path());
    let services = services_for(dir.path()).await;

    let session = services.catalog().browse().await.expect("browse");
    let kinds: Vec<(ItemKind, &str)> = session
        .items()
        .iter()
        .map(|item| (item.kind, item.id.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ItemKind::Course, "python"),
            (ItemKind::Course, "cooking"),
            (ItemKind::Lesson, "variables"),
            (ItemKind::Lesson, "loops"),
            (ItemKind::Lesson, "knife-skills"),
        ]
    );
}

#[tokio::test]
async fn misspelled_query_with_filters_and_sort() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_site(dir.path());
    let services = services_for(dir.path()).await;
    let mut session = services.catalog().browse().await.expect("browse");

    let ids: Vec<&str> = session.run("pythn").items().iter().map(|i| i.id.as_str()).collect();
    assert!(ids.contains(&"python"));

    session.set_difficulty(DifficultyFilter::Only(Difficulty::Advanced));
    let ids: Vec<&str> = session.run("").items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["cooking"]);

    session.set_difficulty(DifficultyFilter::All);
    session.set_sort(SortOrder::Newest);
    let courses: Vec<&str> = session
        .run("")
        .items()
        .iter()
        .filter(|i| i.kind == ItemKind::Course)
        .map(|i| i.id.as_str())
        .collect();
    assert_eq!(courses, vec!["python", "cooking"]);

    session.toggle_tag(TagName::try_from("python".to_owned()).expect("tag"));
    session.toggle_tag(TagName::try_from("basics".to_owned()).expect("tag"));
    let ids: Vec<&str> = session.run("").items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["variables"]);
}

#[tokio::test]
async fn pages_resolve_from_loaded_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_site(dir.path());
    let services = services_for(dir.path()).await;
    let catalog = services.catalog().load().await.expect("load");

    let course = course_page(&catalog, None).expect("course page");
    assert_eq!(course.course.title, "Python Basics");
    assert_eq!(course.modules[0].lessons.len(), 2);

    let lesson = lesson_page(&catalog, Some(&LessonId::new("variables"))).expect("lesson page");
    assert_eq!(lesson.next.map(|l| l.id.as_str()), Some("loops"));
    assert_eq!(lesson.toc[0].anchor, "names-values");
    assert_eq!(lesson.related.len(), 1);

    let missing = lesson_page(&catalog, Some(&LessonId::new("renamed"))).unwrap_err();
    assert_eq!(missing.to_string(), "Lesson not found");
}

#[tokio::test]
async fn missing_lesson_file_fails_naming_the_resource() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_site(dir.path());
    fs::remove_file(dir.path().join("content/lessons/loops.json")).expect("remove");
    let services = services_for(dir.path()).await;

    let err = services.catalog().load().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to load content/lessons/loops.json: not found"
    );
}

#[tokio::test]
async fn fs_source_can_back_the_in_memory_services() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_site(dir.path());
    let services = AppServices::in_memory(
        Arc::new(FsContentSource::new(dir.path())),
        fixed_clock(),
    );
    let catalog = services.catalog().load().await.expect("load");
    assert_eq!(catalog.courses().len(), 2);
}

#[tokio::test]
async fn in_memory_source_reports_missing_manifest() {
    let services = AppServices::in_memory(Arc::new(InMemoryContentSource::new()), fixed_clock());
    let err = services.catalog().load().await.unwrap_err();
    assert!(matches!(
        err,
        services::CatalogError::Load(ContentLoadError::NotFound { .. })
    ));
}

#[tokio::test]
async fn progress_persists_in_sqlite() {
    let config = CatalogConfig::from_values(
        Some("."),
        Some("sqlite:file:memdb_services_progress?mode=memory&cache=shared"),
    )
    .expect("config");
    let services = AppServices::new(&config, fixed_clock()).await.expect("services");
    let progress = services.progress();

    progress
        .record(&LessonId::new("loops"), ProgressPercent::new(55))
        .await
        .expect("record");
    assert_eq!(
        progress.progress(&LessonId::new("loops")).await.expect("read").value(),
        55
    );
    assert_eq!(
        progress.continue_target().await.expect("continue").as_deref(),
        Some("lesson.html?id=loops")
    );
}
