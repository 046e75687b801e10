use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use ivrflow::{
    DirectorySource, FlowDefinition, FlowStore, FlowValidator, MemorySource, TargetRef,
    DEFAULT_FLOW_NAMES,
};

fn flows_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("flows")
}

fn versioned_flow(name: &str, version: u32) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "states": {{
                "main_menu": {{
                    "message": "v{version}",
                    "keypad_map": {{ "1": "flow:other" }}
                }}
            }}
        }}"#
    )
}

#[tokio::test]
async fn bundled_flows_load_without_issues() -> Result<()> {
    let source = DirectorySource::new(flows_dir()).with_flows(DEFAULT_FLOW_NAMES);
    let store = FlowStore::load(Arc::new(source)).await;

    assert_eq!(store.len(), DEFAULT_FLOW_NAMES.len());
    let snapshot = store.snapshot();
    let known: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    for flow in snapshot.values() {
        assert!(flow.contains_state(flow.entry_state()), "{}", flow.name);
        let issues = FlowValidator::validate(flow, &known);
        assert!(issues.is_empty(), "{}: {issues:?}", flow.name);
    }
    Ok(())
}

#[tokio::test]
async fn missing_and_corrupt_files_are_skipped() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("good.json"), versioned_flow("good", 1))?;
    std::fs::write(dir.path().join("broken.json"), "{ \"states\": { ")?;
    std::fs::write(dir.path().join("notes.txt"), "not a flow")?;

    let scanned = FlowStore::load(Arc::new(DirectorySource::new(dir.path()))).await;
    assert_eq!(scanned.flow_names(), vec!["good".to_string()]);

    let named = DirectorySource::new(dir.path()).with_flows(["good", "broken", "absent"]);
    let store = FlowStore::load(Arc::new(named)).await;
    assert_eq!(store.len(), 1);
    assert!(store.get("absent").is_none());

    let empty = store.get_or_empty("broken");
    assert!(empty.is_empty());
    assert_eq!(empty.name, "broken");
    Ok(())
}

#[tokio::test]
async fn unreadable_directory_keeps_current_set() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let flows = dir.path().join("flows");
    std::fs::create_dir(&flows)?;
    std::fs::write(flows.join("good.json"), versioned_flow("good", 1))?;

    let store = FlowStore::load(Arc::new(DirectorySource::new(&flows))).await;
    assert_eq!(store.len(), 1);

    std::fs::remove_dir_all(&flows)?;
    assert_eq!(store.reload().await, 1);
    assert!(store.get("good").is_some());
    Ok(())
}

#[tokio::test]
async fn reload_picks_up_changes() -> Result<()> {
    let source = Arc::new(MemorySource::new());
    source.insert("main", versioned_flow("main", 1));
    source.insert("other", versioned_flow("other", 1));
    let store = FlowStore::load(source.clone()).await;

    let before = store.get("main").map(|f| f.states["main_menu"].message.clone());
    assert_eq!(before.as_deref(), Some("v1"));

    source.insert("main", versioned_flow("main", 2));
    source.remove("other");
    assert_eq!(store.reload().await, 1);

    let after = store.get("main").map(|f| f.states["main_menu"].message.clone());
    assert_eq!(after.as_deref(), Some("v2"));
    assert!(store.get("other").is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_never_see_a_mixed_snapshot() -> Result<()> {
    let source = Arc::new(MemorySource::new());
    for name in ["main", "other"] {
        source.insert(name, versioned_flow(name, 0));
    }
    let store = Arc::new(FlowStore::load(source.clone()).await);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    let snapshot = store.snapshot();
                    assert_eq!(snapshot.len(), 2);
                    let versions: HashSet<&str> = snapshot
                        .values()
                        .map(|flow| flow.states["main_menu"].message.as_str())
                        .collect();
                    assert_eq!(versions.len(), 1, "mixed versions: {versions:?}");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for version in 1..=50 {
        for name in ["main", "other"] {
            source.insert(name, versioned_flow(name, version));
        }
        store.reload().await;
        tokio::task::yield_now().await;
    }

    for reader in readers {
        reader.await?;
    }
    Ok(())
}

#[tokio::test]
async fn serialized_flow_reproduces_the_state_graph() -> Result<()> {
    let store = FlowStore::load(Arc::new(DirectorySource::new(flows_dir()))).await;
    let loaded = store
        .get("booking")
        .ok_or_else(|| anyhow::anyhow!("booking flow missing"))?;

    let json = loaded.to_json_string()?;
    let reparsed = FlowDefinition::from_json_str("booking", &json)?;

    assert_eq!(reparsed, *loaded);
    let targets = |flow: &FlowDefinition| -> Vec<(String, Vec<TargetRef>)> {
        flow.states
            .iter()
            .map(|(id, state)| (id.clone(), state.targets().cloned().collect()))
            .collect()
    };
    assert_eq!(targets(&reparsed), targets(&loaded));
    Ok(())
}

#[tokio::test]
async fn store_key_overrides_declared_flow_name() -> Result<()> {
    let source = Arc::new(MemorySource::new());
    source.insert("booking", versioned_flow("Booking", 1));
    let store = FlowStore::load(source).await;

    let flow = store
        .get("booking")
        .ok_or_else(|| anyhow::anyhow!("booking flow missing"))?;
    assert_eq!(flow.name, "booking");
    assert!(store.get("Booking").is_none());
    Ok(())
}
