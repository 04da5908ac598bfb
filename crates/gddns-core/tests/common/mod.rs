//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles answer from canned data, count calls and record every update
//! body, so tests can assert on exactly what would have been sent.

#![allow(dead_code)]

use gddns_core::error::{Error, Result};
use gddns_core::traits::{DnsProvider, IpSource};
use gddns_core::types::{Record, RecordValue, Zone};
use gddns_core::{ErrorMode, ReconcilerSettings, RetryPolicy};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Canned response for one provider call
pub type Canned<T> = std::result::Result<T, fn() -> Error>;

/// Canned failure; `make` builds a fresh error on every use
pub fn fail<T>(make: fn() -> Error) -> Canned<T> {
    Err(make)
}

/// A provider that serves canned listings and echoes updates
#[derive(Clone)]
pub struct MockDnsProvider {
    zones: Arc<Mutex<VecDeque<Canned<Vec<Zone>>>>>,
    records: Arc<Mutex<VecDeque<Canned<Vec<Record>>>>>,
    update_failure: Option<fn() -> Error>,
    list_zones_calls: Arc<AtomicUsize>,
    record_requests: Arc<Mutex<Vec<Zone>>>,
    updates: Arc<Mutex<Vec<(Zone, Record)>>>,
}

impl MockDnsProvider {
    pub fn new(zones: Vec<Zone>, records: Vec<Record>) -> Self {
        Self {
            zones: Arc::new(Mutex::new(VecDeque::from([Ok(zones)]))),
            records: Arc::new(Mutex::new(VecDeque::from([Ok(records)]))),
            update_failure: None,
            list_zones_calls: Arc::new(AtomicUsize::new(0)),
            record_requests: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue responses for successive `list_zones` calls
    ///
    /// The last queued response is repeated once the queue is drained.
    pub fn with_zone_responses(self, responses: Vec<Canned<Vec<Zone>>>) -> Self {
        *self.zones.lock().unwrap() = VecDeque::from(responses);
        self
    }

    /// Queue responses for successive `list_records` calls
    pub fn with_record_responses(self, responses: Vec<Canned<Vec<Record>>>) -> Self {
        *self.records.lock().unwrap() = VecDeque::from(responses);
        self
    }

    /// Make every `update_record` call fail
    pub fn failing_updates(mut self, error: fn() -> Error) -> Self {
        self.update_failure = Some(error);
        self
    }

    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    /// Zones passed to `list_records`, in call order
    pub fn record_requests(&self) -> Vec<Zone> {
        self.record_requests.lock().unwrap().clone()
    }

    /// (zone, body) pairs passed to `update_record`, in call order
    pub fn updates(&self) -> Vec<(Zone, Record)> {
        self.updates.lock().unwrap().clone()
    }
}

fn next_response<T: Clone>(queue: &Mutex<VecDeque<Canned<T>>>) -> Result<T> {
    let mut queue = queue.lock().unwrap();
    let response = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };
    match response {
        Some(Ok(value)) => Ok(value),
        Some(Err(make_error)) => Err(make_error()),
        None => Err(Error::invalid_input("no canned response")),
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        next_response(&self.zones)
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        self.record_requests.lock().unwrap().push(zone.clone());
        // The real API has no route for an empty zone id
        if zone.id.is_empty() {
            return Err(Error::not_found("//versions//records"));
        }
        next_response(&self.records)
    }

    async fn update_record(&self, zone: &Zone, record: &Record) -> Result<Record> {
        self.updates
            .lock()
            .unwrap()
            .push((zone.clone(), record.clone()));
        match self.update_failure {
            Some(make_error) => Err(make_error()),
            None => Ok(record.clone()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IP source that answers from a script of results
#[derive(Clone)]
pub struct ScriptedIpSource {
    answers: Arc<Mutex<VecDeque<Canned<String>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn fixed(ip: &str) -> Self {
        Self::scripted(vec![Ok(ip.to_string())])
    }

    pub fn scripted(answers: Vec<Canned<String>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::from(answers))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        next_response(&self.answers)
    }
}

pub fn zone(id: &str, name: &str, version: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
        current_version_id: version.to_string(),
    }
}

pub fn a_record(id: &str, name: &str, address: &str) -> Record {
    Record {
        id: id.to_string(),
        record_type: "A".to_string(),
        ttl: 3600,
        name: name.to_string(),
        enable_alias: false,
        addresses: vec![RecordValue::new(address)],
    }
}

/// Settings of the reference scenario: example.com / home.example.com / 300s
pub fn scenario_settings(mode: ErrorMode) -> ReconcilerSettings {
    ReconcilerSettings {
        zone_name: "example.com".to_string(),
        domain_name: "home.example.com".to_string(),
        ttl: 300,
        mode,
        retry: RetryPolicy::none(),
    }
}

/// Collects formatted log lines so tests can assert on emitted warnings
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install a WARN-level subscriber for the current thread
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
