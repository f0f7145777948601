use super::*;
use std::collections::HashMap;

struct MapIconSource {
    icons: HashMap<String, String>,
}

impl IconSource for MapIconSource {
    fn resolve_icon(&self, app_path: &Path) -> Option<String> {
        let key = app_path.to_string_lossy();
        if key.contains("Panics") {
            panic!("icon source exploded");
        }
        self.icons.get(key.as_ref()).cloned()
    }
}

fn apps(count: usize) -> Vec<ApplicationDescriptor> {
    (0..count)
        .map(|index| {
            ApplicationDescriptor::new(format!("App {index}"), format!("/Applications/App{index}.app"))
        })
        .collect()
}

fn scheduler_with(icons: &[(&str, &str)], config: &DiscoveryConfig) -> IconBatchScheduler {
    let source = MapIconSource {
        icons: icons
            .iter()
            .map(|(path, icon)| (path.to_string(), icon.to_string()))
            .collect(),
    };
    IconBatchScheduler::new(Arc::new(source), config)
}

async fn drain(mut receiver: mpsc::Receiver<DiscoveryEvent>) -> Vec<DiscoveryEvent> {
    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn run_should_emit_full_list_before_ordered_batches() {
    let config = DiscoveryConfig::default().without_delays();
    let scheduler = scheduler_with(&[("/Applications/App4.app", "data:icon-4")], &config);
    let (sender, receiver) = mpsc::channel(16);

    let handle = scheduler.run(7, apps(7), sender).await;
    let summary = handle.await.expect("join scheduler");
    let events = drain(receiver).await;

    assert_eq!(events.len(), 4);
    assert!(matches!(&events[0], DiscoveryEvent::FullList { apps, .. } if apps.len() == 7));
    assert!(events[0].apps().iter().all(|app| app.icon.is_none()));
    let batch_sizes = events[1..]
        .iter()
        .map(|event| {
            assert_eq!(event.kind(), "icon_batch");
            event.apps().len()
        })
        .collect::<Vec<_>>();
    assert_eq!(batch_sizes, vec![3, 3, 1]);
    assert!(events.iter().all(|event| event.scan_id() == 7));

    let ordered_paths = events[1..]
        .iter()
        .flat_map(|event| event.apps().iter().map(|app| app.path.clone()))
        .collect::<Vec<_>>();
    let expected_paths = apps(7).into_iter().map(|app| app.path).collect::<Vec<_>>();
    assert_eq!(ordered_paths, expected_paths);
    assert_eq!(events[2].apps()[1].icon.as_deref(), Some("data:icon-4"));

    assert_eq!(
        summary,
        BatchRunSummary {
            scan_id: 7,
            batches_emitted: 3,
            icons_resolved: 1,
            receiver_closed: false,
        }
    );
}

#[tokio::test]
async fn run_should_emit_failed_members_without_icon() {
    let config = DiscoveryConfig::default().without_delays();
    let scheduler = scheduler_with(&[("/Applications/Good.app", "data:good")], &config);
    let (sender, receiver) = mpsc::channel(4);
    let members = vec![
        ApplicationDescriptor::new("Good", "/Applications/Good.app"),
        ApplicationDescriptor::new("Panics", "/Applications/Panics.app"),
    ];

    let summary = scheduler
        .run(1, members, sender)
        .await
        .await
        .expect("join scheduler");
    let events = drain(receiver).await;

    assert_eq!(summary.icons_resolved, 1);
    let batch = events[1].apps();
    assert_eq!(batch[0].icon.as_deref(), Some("data:good"));
    assert_eq!(batch[1].icon, None);
}

#[tokio::test]
async fn run_should_stop_when_receiver_is_dropped_before_full_list() {
    let config = DiscoveryConfig::default().without_delays();
    let scheduler = scheduler_with(&[], &config);
    let (sender, receiver) = mpsc::channel(4);
    drop(receiver);

    let summary = scheduler
        .run(3, apps(5), sender)
        .await
        .await
        .expect("join scheduler");
    assert!(summary.receiver_closed);
    assert_eq!(summary.batches_emitted, 0);
}

#[tokio::test]
async fn run_should_stop_when_receiver_is_dropped_mid_scan() {
    let mut config = DiscoveryConfig::default().without_delays();
    config.initial_delay = Duration::from_millis(50);
    let scheduler = scheduler_with(&[], &config);
    let (sender, mut receiver) = mpsc::channel(1);

    let handle = scheduler.run(9, apps(6), sender).await;
    let first = receiver.recv().await.expect("full list");
    assert_eq!(first.kind(), "full_list");
    drop(receiver);

    let summary = handle.await.expect("join scheduler");
    assert!(summary.receiver_closed);
    assert_eq!(summary.batches_emitted, 0);
}

#[tokio::test]
async fn run_should_only_send_full_list_for_empty_scan() {
    let config = DiscoveryConfig::default().without_delays();
    let scheduler = scheduler_with(&[], &config);
    let (sender, receiver) = mpsc::channel(2);

    let summary = scheduler
        .run(2, Vec::new(), sender)
        .await
        .await
        .expect("join scheduler");
    let events = drain(receiver).await;
    assert_eq!(events.len(), 1);
    assert_eq!(summary.batches_emitted, 0);
}
