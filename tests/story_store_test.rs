mod common;

use agromitra::stories::{NewStory, PgStoryStore, StoryFilter, StoryStore, TRENDING_LIMIT};
use testcontainers::clients::Cli;
use uuid::Uuid;

macro_rules! setup_test {
    ($docker:ident, $container:ident, $store:ident) => {
        let $docker = Cli::default();
        let $container = $docker.run(common::create_postgres_container());
        let host_port = $container.get_host_port_ipv4(common::POSTGRES_PORT);
        let db = common::connect_database(host_port).await;
        let $store = PgStoryStore::new(db.pool().clone());
        $store.seed_if_empty().await.unwrap();
    };
}

#[tokio::test]
async fn test_seed_only_once() {
    setup_test!(_docker, _container, store);

    assert_eq!(store.seed_if_empty().await.unwrap(), 0);
    let feed = store.feed(50).await.unwrap();
    assert_eq!(feed.len(), 8);
    assert!(feed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
    assert_eq!(feed[0].title, "Organic Tomato Harvest");
}

#[tokio::test]
async fn test_like_and_view_counters() {
    setup_test!(_docker, _container, store);

    let story = store.feed(1).await.unwrap().remove(0);
    assert_eq!(store.like(story.id).await.unwrap(), Some(story.likes + 1));
    assert_eq!(
        store.increment_view(story.id).await.unwrap(),
        Some(story.views + 1)
    );

    let reloaded = store.get(story.id).await.unwrap().unwrap();
    assert_eq!(reloaded.likes, story.likes + 1);
    assert_eq!(reloaded.views, story.views + 1);

    let missing = Uuid::new_v4();
    assert_eq!(store.like(missing).await.unwrap(), None);
    assert_eq!(store.increment_view(missing).await.unwrap(), None);
    assert!(store.get(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_appears_first_in_feed() {
    setup_test!(_docker, _container, store);

    let story = NewStory {
        username: "MeenaKrishi".to_string(),
        title: "Mustard in bloom".to_string(),
        crop: "Mustard".to_string(),
        tags: vec!["Rabi".to_string()],
        ..NewStory::default()
    };
    let created = store.create(story).await.unwrap();
    assert_eq!(created.likes, 0);
    assert_eq!(created.location, "India");
    assert_eq!(created.tags, vec!["Rabi".to_string()]);

    let feed = store.feed(50).await.unwrap();
    assert_eq!(feed.len(), 9);
    assert_eq!(feed[0].id, created.id);

    let mine = store.by_username("MeenaKrishi").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(store.by_username("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_trending_by_views() {
    setup_test!(_docker, _container, store);

    let views: Vec<i64> = store
        .trending(TRENDING_LIMIT)
        .await
        .unwrap()
        .iter()
        .map(|s| s.views)
        .collect();
    assert_eq!(views, vec![4152, 3421, 2134, 1876, 1567]);
}

#[tokio::test]
async fn test_search_matches_memory_semantics() {
    setup_test!(_docker, _container, store);

    let organic = store
        .search(&StoryFilter::new(Some("ORGANIC"), None, None))
        .await
        .unwrap();
    assert!(!organic.is_empty());
    assert!(organic.iter().all(|s| StoryFilter::new(Some("organic"), None, None).matches(s)));

    let rice = store
        .search(&StoryFilter::new(None, Some("rice"), Some("tamil")))
        .await
        .unwrap();
    assert_eq!(rice.len(), 1);
    assert_eq!(rice[0].username, "KumarFarms");

    let everything = store.search(&StoryFilter::default()).await.unwrap();
    assert_eq!(everything.len(), 8);

    let none = store
        .search(&StoryFilter::new(Some("zzz-no-match"), None, None))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_long_fields_are_stored() {
    setup_test!(_docker, _container, store);

    let story = NewStory {
        title: "t".repeat(201),
        crop: "c".repeat(81),
        duration: "12:34:56.789-long".to_string(),
        ..NewStory::default()
    };
    let created = store.create(story).await.unwrap();
    let stored = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.title.len(), 201);
    assert_eq!(stored.crop.len(), 81);
}
