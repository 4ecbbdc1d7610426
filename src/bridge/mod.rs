//! Host bridge — exposes the store to a scripting host by method name.
//!
//! A host calls `setItem`, `getItem`, `removeItem` or `clear` on the
//! `EncryptedStorage` module and gets back a settlement: either
//! `{"resolve": value}` or `{"reject": {code, message, cause}}`.
//! `serve` speaks this as line-delimited JSON, one request per line:
//!
//! ```text
//! > {"id":1,"method":"setItem","args":["token","abc123"]}
//! < {"id":1,"resolve":"abc123"}
//! > {"id":2,"method":"getItem","args":["missing"]}
//! < {"id":2,"resolve":null}
//! ```

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::Auditor;
use crate::errors::{Result, StorageError};
use crate::vault::SecretStore;

/// Module name a host addresses the store by.
pub const MODULE_NAME: &str = "EncryptedStorage";

/// Rejection code for requests that never reach the store.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// One method call from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRequest {
    /// Correlation id, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub method: String,

    #[serde(default)]
    pub args: Vec<Value>,
}

impl HostRequest {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id: None,
            module: None,
            method: method.into(),
            args,
        }
    }
}

/// Failure payload handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Rejection {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_REQUEST.to_string(),
            message: message.into(),
            cause: None,
        }
    }
}

impl From<&StorageError> for Rejection {
    fn from(err: &StorageError) -> Self {
        Self {
            code: err.kind().code().to_string(),
            message: err.to_string(),
            cause: err.cause().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    Resolve(Value),
    Reject(Rejection),
}

/// Reply to one `HostRequest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(flatten)]
    pub settlement: Settlement,
}

impl HostResponse {
    /// The resolved value, if the call succeeded.
    pub fn resolved(&self) -> Option<&Value> {
        match &self.settlement {
            Settlement::Resolve(v) => Some(v),
            Settlement::Reject(_) => None,
        }
    }

    /// The rejection payload, if the call failed.
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.settlement {
            Settlement::Resolve(_) => None,
            Settlement::Reject(r) => Some(r),
        }
    }
}

/// The four methods the module exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    SetItem,
    GetItem,
    RemoveItem,
    Clear,
}

impl Method {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "setItem" => Some(Self::SetItem),
            "getItem" => Some(Self::GetItem),
            "removeItem" => Some(Self::RemoveItem),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SetItem => "setItem",
            Self::GetItem => "getItem",
            Self::RemoveItem => "removeItem",
            Self::Clear => "clear",
        }
    }

    fn arity(self) -> usize {
        match self {
            Self::SetItem => 2,
            Self::GetItem | Self::RemoveItem => 1,
            Self::Clear => 0,
        }
    }
}

/// Dispatches host requests to a `SecretStore`.
pub struct Bridge {
    store: SecretStore,
    auditor: Auditor,
}

impl Bridge {
    pub fn new(store: SecretStore, auditor: Auditor) -> Self {
        Self { store, auditor }
    }

    pub fn store(&self) -> &SecretStore {
        &self.store
    }

    /// Run one request to completion.
    pub fn handle(&self, request: HostRequest) -> HostResponse {
        let settlement = match self.call(&request) {
            Ok(value) => Settlement::Resolve(value),
            Err(rejection) => Settlement::Reject(rejection),
        };
        HostResponse {
            id: request.id,
            settlement,
        }
    }

    fn call(&self, request: &HostRequest) -> std::result::Result<Value, Rejection> {
        if let Some(module) = &request.module {
            if module != MODULE_NAME {
                return Err(Rejection::invalid(format!("Unknown module '{module}'")));
            }
        }

        let method = Method::parse(&request.method)
            .ok_or_else(|| Rejection::invalid(format!("Unknown method '{}'", request.method)))?;

        if request.args.len() != method.arity() {
            return Err(Rejection::invalid(format!(
                "{} expects {} argument(s), got {}",
                method.name(),
                method.arity(),
                request.args.len()
            )));
        }

        match method {
            Method::SetItem => {
                let key = string_arg(method, &request.args, 0)?;
                let value = string_arg(method, &request.args, 1)?;
                let result = self.store.set_item(key, value);
                self.settle(method, Some(key), result, Value::String)
            }
            Method::GetItem => {
                let key = string_arg(method, &request.args, 0)?;
                let result = self.store.get_item(key);
                self.settle(method, Some(key), result, |v| {
                    v.map_or(Value::Null, Value::String)
                })
            }
            Method::RemoveItem => {
                let key = string_arg(method, &request.args, 0)?;
                let result = self.store.remove_item(key);
                self.settle(method, Some(key), result, Value::String)
            }
            Method::Clear => {
                let result = self.store.clear();
                self.settle(method, None, result, |()| Value::Null)
            }
        }
    }

    fn settle<T>(
        &self,
        method: Method,
        key: Option<&str>,
        result: Result<T>,
        to_value: impl FnOnce(T) -> Value,
    ) -> std::result::Result<Value, Rejection> {
        self.auditor.record(method.name(), key, &result);
        result.map(to_value).map_err(|e| Rejection::from(&e))
    }

    /// Answer line-delimited JSON requests from `reader` until EOF.
    ///
    /// Blank lines are skipped; a line that is not a valid request (bad
    /// UTF-8 included) gets an `INVALID_REQUEST` rejection and the loop
    /// carries on. Only a failed read ends it early. Returns the number of
    /// responses written.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<usize> {
        let mut answered = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match serde_json::from_str::<HostRequest>(line.trim()) {
                    Ok(request) => self.handle(request),
                    Err(e) => malformed(e),
                },
                Err(e) => malformed(e),
            };

            let encoded = serde_json::to_string(&response)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            writeln!(writer, "{encoded}")?;
            writer.flush()?;
            answered += 1;
        }

        Ok(answered)
    }
}

fn malformed(err: impl std::fmt::Display) -> HostResponse {
    HostResponse {
        id: None,
        settlement: Settlement::Reject(Rejection::invalid(format!("Malformed request: {err}"))),
    }
}

fn string_arg<'a>(
    method: Method,
    args: &'a [Value],
    index: usize,
) -> std::result::Result<&'a str, Rejection> {
    args.get(index).and_then(Value::as_str).ok_or_else(|| {
        Rejection::invalid(format!(
            "{} argument {} must be a string",
            method.name(),
            index + 1
        ))
    })
}
