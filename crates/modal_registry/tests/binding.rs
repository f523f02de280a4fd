//! End-to-end binding against an in-memory store built from synthesized reducers.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use modux_registry::{
	ActionResult, Dispatch, Message, ModalSpec, ReducerMap, Registry, RegistryError, Store,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

/// Keeps every root state it has ever held; `dispatch` answers with the new root.
struct TestStore {
	reducers: ReducerMap,
	history: Mutex<Vec<(Option<Message>, Value)>>,
}

impl TestStore {
	fn new(reducers: ReducerMap) -> Arc<Self> {
		let root: Map<String, Value> = reducers
			.iter()
			.map(|(ns, reducer)| (ns.clone(), reducer.initial_state().clone()))
			.collect();
		Arc::new(Self {
			reducers,
			history: Mutex::new(vec![(None, Value::Object(root))]),
		})
	}

	fn log(&self) -> Vec<Message> {
		self.history
			.lock()
			.iter()
			.filter_map(|(message, _)| message.clone())
			.collect()
	}

	/// Root snapshots of one namespace, oldest first, including the initial one.
	fn snapshots(&self, namespace: &str) -> Vec<Value> {
		self.history
			.lock()
			.iter()
			.map(|(_, root)| root[namespace].clone())
			.collect()
	}
}

impl Store for TestStore {
	fn get_state(&self) -> Value {
		self.history.lock().last().map(|(_, root)| root.clone()).unwrap_or_default()
	}

	fn dispatch(&self, message: Message) -> Value {
		let mut history = self.history.lock();
		let mut root = history.last().map(|(_, root)| root.clone()).unwrap_or_default();
		for (ns, reducer) in &self.reducers {
			let slice = root.get(ns.as_str()).cloned();
			root[ns.as_str()] = reducer.reduce(slice, &message);
		}
		history.push((Some(message), root.clone()));
		root
	}
}

fn n(state: &Value) -> i64 {
	state["n"].as_i64().unwrap_or(0)
}

fn counter() -> ModalSpec {
	ModalSpec::new("counter")
		.state(json!({ "n": 0 }))
		.getter("double", |s| json!(n(s) * 2))
		.reducer("inc", |s, p| json!({ "n": n(s) + p.as_i64().unwrap_or(0) }))
}

#[test]
fn counter_scenario() {
	let _ = tracing_subscriber::fmt::try_init();

	let mut registry = Registry::new();
	let store = TestStore::new(registry.declare([counter()]).unwrap());
	registry.attach_store(store.clone());

	let state = registry.resolve_getters(&["double"]).unwrap();
	assert_eq!(state.project(&json!({ "counter": { "n": 3 } }))["double"], json!(6));

	let dispatch = Dispatch::from_store(store.clone());
	let actions = registry.resolve_actions(&["counter.inc"]).unwrap().bind(&dispatch);
	assert_eq!(actions["inc"].call(json!(5)), json!({ "counter": { "n": 5 } }));

	assert_eq!(store.log(), vec![Message::new("counter", "inc", json!(5))]);
	assert_eq!(state.project(&store.get_state())["double"], json!(10));
	assert_eq!(registry.read_getter("double").unwrap(), json!(10));
}

#[test]
fn distinct_namespaces_both_resolve() {
	let mut registry = Registry::new();
	registry
		.declare([
			ModalSpec::new("a").getter("one", |_| json!(1)),
			ModalSpec::new("b").getter("two", |_| json!(2)),
		])
		.unwrap();

	let values = registry
		.resolve_getters(&["one", "two"])
		.unwrap()
		.project(&json!({ "a": {}, "b": {} }));
	assert_eq!(values.into_iter().collect::<Vec<_>>(), vec![
		("one".to_string(), json!(1)),
		("two".to_string(), json!(2)),
	]);

	assert_eq!(
		registry.declare([ModalSpec::new("a")]).unwrap_err(),
		RegistryError::DuplicateNamespace("a".into())
	);
}

#[test]
fn deferred_commits_arrive_from_worker_thread() {
	let _ = tracing_subscriber::fmt::try_init();

	let spec = ModalSpec::new("profile")
		.state(json!({ "loading": false, "name": null }))
		.action("load", |id| {
			ActionResult::deferred(move |commit| {
				commit.commit("set_loading", json!(true));
				thread::spawn(move || {
					thread::sleep(Duration::from_millis(10));
					commit.commit("set_name", json!(format!("user-{id}")));
					commit.commit("set_loading", json!(false));
				});
				json!("pending")
			})
		})
		.reducer("set_loading", |s, p| {
			let mut next = s.clone();
			next["loading"] = p.clone();
			next
		})
		.reducer("set_name", |s, p| {
			let mut next = s.clone();
			next["name"] = p.clone();
			next
		});

	let mut registry = Registry::new();
	let store = TestStore::new(registry.declare([spec]).unwrap());

	let (tx, rx) = mpsc::channel();
	let tx = Mutex::new(tx);
	let sink = store.clone();
	let dispatch = Dispatch::new(move |message| {
		let result = sink.dispatch(message);
		let _ = tx.lock().send(());
		result
	});

	let actions = registry.resolve_actions(&["load"]).unwrap().bind(&dispatch);
	assert_eq!(actions["load"].call(json!(7)), json!("pending"));

	for _ in 0..3 {
		rx.recv_timeout(Duration::from_secs(5)).expect("commit");
	}

	assert_eq!(
		store.log(),
		vec![
			Message::new("profile", "set_loading", json!(true)),
			Message::new("profile", "set_name", json!("user-7")),
			Message::new("profile", "set_loading", json!(false)),
		]
	);
	assert_eq!(
		store.snapshots("profile"),
		vec![
			json!({ "loading": false, "name": null }),
			json!({ "loading": true, "name": null }),
			json!({ "loading": true, "name": "user-7" }),
			json!({ "loading": false, "name": "user-7" }),
		]
	);
}

#[test]
fn direct_accessors_before_store() {
	let mut registry = Registry::new();
	registry.declare([counter()]).unwrap();

	assert_eq!(registry.read_getter("double"), Err(RegistryError::StoreNotInitialized));
	assert_eq!(
		registry.write_action("counter.inc").unwrap_err(),
		RegistryError::StoreNotInitialized
	);
	assert!(matches!(
		registry.read_getter("counter.n.extra"),
		Err(RegistryError::InvalidAddress { .. })
	));
}

#[test]
fn registry_is_shareable_across_threads() {
	let mut registry = Registry::new();
	let store = TestStore::new(registry.declare([counter()]).unwrap());
	registry.attach_store(store.clone());
	let registry = Arc::new(registry);

	let workers: Vec<_> = (0..4)
		.map(|_| {
			let registry = registry.clone();
			thread::spawn(move || {
				registry.write_action("counter.inc").unwrap().call(json!(1));
			})
		})
		.collect();
	for worker in workers {
		worker.join().unwrap();
	}

	assert_eq!(registry.read_getter("counter.n").unwrap(), json!(4));
	let mut seen: Vec<i64> = store.snapshots("counter").iter().map(n).collect();
	seen.sort_unstable();
	assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}
