use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use vim_proto::ManagedObjectReference;

use crate::{VimError, VimResult};

/// Moves encoded requests to the server and raw JSON responses back.
///
/// Implementations own the session; callers only see remote faults and
/// transport failures as [`VimError`].
#[async_trait]
pub trait RoundTripper: Send + Sync {
    async fn invoke(
        &self,
        this: &ManagedObjectReference,
        method: &str,
        body: Value,
    ) -> VimResult<Value>;

    /// Reads a single top-level property of `this`.
    async fn property(&self, this: &ManagedObjectReference, path: &str) -> VimResult<Value>;
}

/// One method invocation captured by [`InMemoryTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub this: ManagedObjectReference,
    pub method: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    Value(Value),
    Fault { type_name: String, message: String },
}

impl Reply {
    fn into_result(self) -> VimResult<Value> {
        match self {
            Reply::Value(value) => Ok(value),
            Reply::Fault { type_name, message } => Err(VimError::Fault {
                detail: serde_json::json!({ "_typeName": type_name }),
                type_name,
                message,
            }),
        }
    }
}

/// In-memory adapter for tests and early wiring.
///
/// Replies are queued per method name and per `(object, property)`. Each read
/// pops the front of its queue but the last entry stays, so a single scripted
/// value answers every call. Unscripted methods return `null` (a void
/// result) and unscripted properties read as unset.
#[derive(Default)]
pub struct InMemoryTransport {
    calls: Mutex<Vec<RecordedCall>>,
    reads: Mutex<Vec<(ManagedObjectReference, String)>>,
    methods: Mutex<HashMap<String, VecDeque<Reply>>>,
    properties: Mutex<HashMap<(ManagedObjectReference, String), VecDeque<Reply>>>,
}

impl InMemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// # Panics
    ///
    /// Panics if `value` does not serialize to JSON.
    pub fn reply<T: Serialize>(&self, method: &str, value: T) {
        let value = serde_json::to_value(value).expect("scripted reply serializes");
        self.push_method(method, Reply::Value(value));
    }

    pub fn fault(&self, method: &str, type_name: &str, message: &str) {
        self.push_method(
            method,
            Reply::Fault {
                type_name: type_name.to_string(),
                message: message.to_string(),
            },
        );
    }

    /// # Panics
    ///
    /// Panics if `value` does not serialize to JSON.
    pub fn set_property<T: Serialize>(&self, this: &ManagedObjectReference, path: &str, value: T) {
        let value = serde_json::to_value(value).expect("scripted property serializes");
        self.properties
            .lock()
            .entry((this.clone(), path.to_string()))
            .or_default()
            .push_back(Reply::Value(value));
    }

    pub fn property_fault(
        &self,
        this: &ManagedObjectReference,
        path: &str,
        type_name: &str,
        message: &str,
    ) {
        self.properties
            .lock()
            .entry((this.clone(), path.to_string()))
            .or_default()
            .push_back(Reply::Fault {
                type_name: type_name.to_string(),
                message: message.to_string(),
            });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// Property reads in the order they were served.
    pub fn reads(&self) -> Vec<(ManagedObjectReference, String)> {
        self.reads.lock().clone()
    }

    fn push_method(&self, method: &str, reply: Reply) {
        self.methods
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    fn next<K>(queues: &mut HashMap<K, VecDeque<Reply>>, key: &K) -> Option<Reply>
    where
        K: std::hash::Hash + Eq,
    {
        let queue = queues.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl RoundTripper for InMemoryTransport {
    async fn invoke(
        &self,
        this: &ManagedObjectReference,
        method: &str,
        body: Value,
    ) -> VimResult<Value> {
        self.calls.lock().push(RecordedCall {
            this: this.clone(),
            method: method.to_string(),
            body,
        });
        let reply = {
            let mut methods = self.methods.lock();
            Self::next(&mut *methods, &method.to_string())
        };
        reply.map_or(Ok(Value::Null), Reply::into_result)
    }

    async fn property(&self, this: &ManagedObjectReference, path: &str) -> VimResult<Value> {
        let key = (this.clone(), path.to_string());
        self.reads.lock().push(key.clone());
        let reply = {
            let mut properties = self.properties.lock();
            Self::next(&mut *properties, &key)
        };
        reply.map_or(Ok(Value::Null), Reply::into_result)
    }
}
