use super::*;
use std::sync::atomic::AtomicUsize;

fn app(name: &str, icon: Option<&str>) -> ApplicationDescriptor {
    ApplicationDescriptor::new(name, format!("/Applications/{name}.app"))
        .with_icon(icon.map(ToString::to_string))
}

fn full_list(scan_id: u64, apps: Vec<ApplicationDescriptor>) -> DiscoveryEvent {
    DiscoveryEvent::FullList { scan_id, apps }
}

fn icon_batch(scan_id: u64, apps: Vec<ApplicationDescriptor>) -> DiscoveryEvent {
    DiscoveryEvent::IconBatch { scan_id, apps }
}

fn counting_observer() -> (Observer, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let observer: Observer = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (observer, calls)
}

#[test]
fn apply_full_list_should_replace_snapshot_and_notify() {
    let cache = DiscoveryCache::default();
    let (observer, calls) = counting_observer();
    let _subscription = cache.subscribe(observer);

    assert!(cache.apply(&full_list(1, vec![app("Books", None), app("Calendar", None)])));
    assert_eq!(cache.current_snapshot().len(), 2);
    assert_eq!(cache.latest_scan_id(), Some(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn icon_batch_should_update_only_known_paths_with_new_icons() {
    let cache = DiscoveryCache::default();
    cache.apply(&full_list(1, vec![app("Books", None), app("Calendar", None)]));
    let (observer, calls) = counting_observer();
    let _subscription = cache.subscribe(observer);

    assert!(cache.apply(&icon_batch(
        1,
        vec![app("Books", Some("data:books")), app("Unknown", Some("data:unknown"))],
    )));
    assert!(!cache.apply(&icon_batch(1, vec![app("Books", Some("data:books"))])));
    assert!(!cache.apply(&icon_batch(1, vec![app("Calendar", None)])));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        cache.stats(),
        CacheStatsDto {
            total_apps: 2,
            apps_with_icons: 1,
        }
    );
}

#[test]
fn cached_icons_should_never_regress_to_empty() {
    let cache = DiscoveryCache::default();
    cache.apply(&full_list(1, vec![app("Books", None)]));
    cache.apply(&icon_batch(1, vec![app("Books", Some("data:books"))]));

    cache.apply(&icon_batch(1, vec![app("Books", Some(""))]));
    cache.apply(&full_list(2, vec![app("Books", None), app("Maps", None)]));

    let snapshot = cache.current_snapshot();
    assert_eq!(snapshot[0].icon.as_deref(), Some("data:books"));
    assert_eq!(snapshot[1].icon, None);
}

#[test]
fn stale_full_list_should_be_ignored_but_stale_icons_still_merge() {
    let cache = DiscoveryCache::default();
    cache.apply(&full_list(5, vec![app("Books", None)]));

    assert!(!cache.apply(&full_list(4, vec![app("Old", None)])));
    assert_eq!(cache.current_snapshot()[0].name, "Books");

    assert!(cache.apply(&icon_batch(4, vec![app("Books", Some("data:books"))])));
    assert_eq!(cache.latest_scan_id(), Some(5));
}

#[test]
fn search_should_match_case_insensitive_substrings_sorted_by_name() {
    let cache = DiscoveryCache::default();
    cache.apply(&full_list(
        1,
        vec![
            app("Visual Studio Code", None),
            app("Android Studio", None),
            app("Calendar", None),
        ],
    ));

    let names = cache
        .search("STUDIO")
        .into_iter()
        .map(|app| app.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Android Studio", "Visual Studio Code"]);
    assert!(cache.search("nothing-like-this").is_empty());
}

#[test]
fn search_with_blank_term_should_return_quick_action_prefix() {
    let cache = DiscoveryCache::new(2);
    cache.apply(&full_list(
        1,
        vec![app("A", None), app("B", None), app("C", None)],
    ));

    let quick = cache.search("  ");
    assert_eq!(quick.len(), 2);
    assert_eq!(quick[0].name, "A");
}

#[test]
fn dropping_or_unsubscribing_should_remove_observers() {
    let cache = DiscoveryCache::default();
    let (first, first_calls) = counting_observer();
    let (second, second_calls) = counting_observer();
    let first_subscription = cache.subscribe(first);
    let second_subscription = cache.subscribe(second);
    assert_eq!(cache.observer_count(), 2);

    first_subscription.unsubscribe();
    cache.apply(&full_list(1, vec![app("Books", None)]));
    drop(second_subscription);
    cache.apply(&full_list(2, vec![app("Maps", None)]));

    assert_eq!(cache.observer_count(), 0);
    assert_eq!(first_calls.load(Ordering::SeqCst), 0);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn subscription_should_outlive_cache_without_panicking() {
    let cache = DiscoveryCache::default();
    let (observer, _) = counting_observer();
    let subscription = cache.subscribe(observer);
    drop(cache);
    subscription.unsubscribe();
}
