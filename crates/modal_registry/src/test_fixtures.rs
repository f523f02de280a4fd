use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use serde_json::{Map, Value, json};

use crate::message::{Dispatch, Message};
use crate::modal::{ActionResult, ModalSpec};
use crate::reducer::ReducerMap;
use crate::store::Store;

fn int(v: &Value, key: &str) -> i64 {
	v.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// `counter` modal: state `{ n }`, getter `double`, action `add`, reducers `inc` and `reset`.
pub(crate) fn counter_spec() -> ModalSpec {
	ModalSpec::new("counter")
		.state(json!({ "n": 0 }))
		.getter("double", |s| json!(int(s, "n") * 2))
		.action("add", |args| ActionResult::Value(args))
		.reducer("inc", |s, p| json!({ "n": int(s, "n") + p.as_i64().unwrap_or(0) }))
		.reducer("reset", |_, _| json!({ "n": 0 }))
}

/// `user` modal: state `{ name, n }`, getters `label` and `double` (shadowing counter's).
pub(crate) fn user_spec() -> ModalSpec {
	ModalSpec::new("user")
		.state(json!({ "name": "ada", "n": 100 }))
		.getter("label", |s| json!(format!("user:{}", s["name"].as_str().unwrap_or_default())))
		.getter("double", |s| json!(int(s, "n") * 2))
		.action("rename", |args| ActionResult::Value(args))
		.action("add", |args| ActionResult::Value(args))
		.reducer("rename", |s, p| {
			let mut next = s.clone();
			next["name"] = p.clone();
			next
		})
}

/// Dispatch sink that records messages and answers `"ok"`.
#[derive(Clone)]
pub(crate) struct Recorder {
	inner: Arc<(Mutex<Vec<Message>>, Condvar)>,
}

impl Recorder {
	pub(crate) fn new() -> Self {
		Self {
			inner: Arc::new((Mutex::new(Vec::new()), Condvar::new())),
		}
	}

	pub(crate) fn dispatch(&self) -> Dispatch {
		let inner = self.inner.clone();
		Dispatch::new(move |message| {
			let (log, cvar) = &*inner;
			log.lock().push(message);
			cvar.notify_all();
			json!("ok")
		})
	}

	pub(crate) fn messages(&self) -> Vec<Message> {
		self.inner.0.lock().clone()
	}

	/// Blocks until at least `n` messages were recorded.
	pub(crate) fn wait_for(&self, n: usize) {
		let (log, cvar) = &*self.inner;
		let mut guard = log.lock();
		while guard.len() < n {
			if cvar.wait_for(&mut guard, Duration::from_secs(5)).timed_out() {
				panic!("timed out waiting for {n} messages, got {}", guard.len());
			}
		}
	}
}

/// Store that applies messages through synthesized reducers.
pub(crate) struct MemoryStore {
	reducers: ReducerMap,
	state: Mutex<Value>,
	log: Mutex<Vec<Message>>,
}

impl MemoryStore {
	pub(crate) fn new(reducers: ReducerMap) -> Arc<Self> {
		let state = reducers
			.iter()
			.map(|(ns, r)| (ns.clone(), r.initial_state().clone()))
			.collect::<Map<_, _>>();
		Arc::new(Self {
			reducers,
			state: Mutex::new(Value::Object(state)),
			log: Mutex::new(Vec::new()),
		})
	}

	pub(crate) fn messages(&self) -> Vec<Message> {
		self.log.lock().clone()
	}
}

impl Store for MemoryStore {
	fn get_state(&self) -> Value {
		self.state.lock().clone()
	}

	fn dispatch(&self, message: Message) -> Value {
		let mut state = self.state.lock();
		for (ns, reducer) in &self.reducers {
			let slice = state.get(ns.as_str()).cloned();
			state[ns.as_str()] = reducer.reduce(slice, &message);
		}
		self.log.lock().push(message);
		Value::Bool(true)
	}
}
