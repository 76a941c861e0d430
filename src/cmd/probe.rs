//! `loadmark probe` — fire each scenario task once and report the
//! markers that were attached.
//!
//! Probing is a preflight for a load run: it proves the scenario
//! parses, the target answers, and every outbound call carries the
//! full marker set. `--dry-run` computes the markers without sending
//! anything; `--repeat` shows invocation-id stability across calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::cli::ProbeArgs;
use crate::client::session::Session;
use crate::client::tracked::TrackedSession;
use crate::client::{CallOutcome, Dispatch, OutboundCall};
use crate::config::model::TaskSpec;
use crate::config::{load_scenario, resolve_scenario_path};
use crate::error::LoadmarkError;
use crate::logging;
use crate::track::headers::{
    marker_headers, TRACEPARENT, TRACKEDTEST_INVOCATION_ID, TRACKEDTEST_NAME,
};
use crate::track::Tracker;

pub async fn execute(args: ProbeArgs) -> Result<(), LoadmarkError> {
    let log_format = logging::resolve_format(args.pretty, args.json_logs);
    logging::init(&args.log_level, log_format);

    let path = resolve_scenario_path(args.config.as_deref()).await?;
    let mut scenario = load_scenario(&path).await?;

    if let Some(ref base_url) = args.base_url {
        tracing::debug!(base_url = %base_url, "base URL overridden from CLI");
        scenario.base_url.clone_from(base_url);
    }
    if let Some(timeout) = args.timeout {
        scenario.defaults.timeout = timeout;
    }

    let selected: Vec<&TaskSpec> = scenario
        .tasks
        .iter()
        .filter(|t| args.task.as_deref().map_or(true, |name| name == t.name))
        .collect();
    if selected.is_empty() {
        if let Some(name) = args.task {
            return Err(LoadmarkError::UnknownTask { name });
        }
    }

    tracing::info!(
        path = %path.display(),
        suite = %scenario.suite,
        tasks = selected.len(),
        dry_run = args.dry_run,
        "probing scenario"
    );

    let tracker = Tracker::new(&scenario.suite, scenario.tracking.to_options());

    let probes = if args.dry_run {
        dry_run_probes(&tracker, &selected, args.repeat)
    } else {
        send_probes(&tracker, &scenario.base_url, scenario.defaults.timeout, &selected, args.repeat)
            .await?
    };

    let failed = probes.iter().filter(|p| p.error.is_some()).count();
    let total = probes.len();

    let report = ProbeReport {
        scenario: path.display().to_string(),
        suite: scenario.suite,
        base_url: scenario.base_url,
        dry_run: args.dry_run,
        probes,
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| LoadmarkError::Io(std::io::Error::other(e.to_string())))?;
        println!("{rendered}");
    } else {
        print_text_report(&report);
    }

    if failed > 0 {
        return Err(LoadmarkError::ProbeFailed { failed, total });
    }

    Ok(())
}

#[derive(Serialize)]
struct ProbeReport {
    scenario: String,
    suite: String,
    base_url: String,
    dry_run: bool,
    probes: Vec<ProbeOutcome>,
}

#[derive(Serialize)]
struct ProbeOutcome {
    task: String,
    method: String,
    path: String,
    tracked_name: String,
    traceparent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    invocation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Compute markers for each selected task without opening a socket.
fn dry_run_probes(tracker: &Tracker, selected: &[&TaskSpec], repeat: u32) -> Vec<ProbeOutcome> {
    let mut probes = Vec::new();
    for task in selected {
        let scoped = tracker.bind_instance();
        for _ in 0..repeat {
            let tag = tracker.tag_scoped(&scoped, &task.name);
            let headers = marker_headers(&tag);
            probes.push(outcome_from_headers(task, &headers, None, None, None));
        }
    }
    probes
}

/// Send each selected task through a tracked session and collect what
/// actually went out on the wire. Failed calls are reported, not
/// aborted on.
async fn send_probes(
    tracker: &Tracker,
    base_url: &str,
    timeout_ms: u64,
    selected: &[&TaskSpec],
    repeat: u32,
) -> Result<Vec<ProbeOutcome>, LoadmarkError> {
    let session = Arc::new(Session::new(base_url, Duration::from_millis(timeout_ms))?);

    let mut probes = Vec::new();
    for task in selected {
        let capture = Capture {
            inner: Arc::clone(&session),
            last: Mutex::new(None),
        };
        let tracked = TrackedSession::new(capture, tracker).for_task(&task.name);

        for _ in 0..repeat {
            let result = tracked.send(build_call(task)?).await;
            let sent = tracked.inner().last.lock().await.take().unwrap_or_default();

            match result {
                Ok(outcome) => probes.push(outcome_from_headers(
                    task,
                    &sent,
                    Some(outcome.status.as_u16()),
                    Some(outcome.latency_ms),
                    None,
                )),
                Err(e) => {
                    tracing::warn!(task = %task.name, error = %e, "probe request failed");
                    probes.push(outcome_from_headers(task, &sent, None, None, Some(e.to_string())));
                }
            }
        }
    }
    Ok(probes)
}

/// Records the headers handed to the transport, so the report shows
/// ground truth rather than a recomputed guess.
struct Capture {
    inner: Arc<Session>,
    last: Mutex<Option<HeaderMap>>,
}

#[async_trait]
impl Dispatch for Capture {
    async fn dispatch(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
        *self.last.lock().await = Some(call.headers.clone());
        self.inner.dispatch(call).await
    }
}

fn build_call(task: &TaskSpec) -> Result<OutboundCall, LoadmarkError> {
    let method = task
        .method
        .to_uppercase()
        .parse::<Method>()
        .map_err(|e| LoadmarkError::HttpRequest {
            source: Box::new(e),
        })?;

    let mut headers = HeaderMap::new();
    for (key, value) in &task.headers {
        match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => tracing::warn!(task = %task.name, header = %key, "skipping malformed task header"),
        }
    }

    let mut call = OutboundCall::new(method, &task.path).with_headers(headers);
    if let Some(ref body) = task.body {
        call = call.with_body(body.clone());
    }
    Ok(call)
}

fn outcome_from_headers(
    task: &TaskSpec,
    headers: &HeaderMap,
    status: Option<u16>,
    latency_ms: Option<u64>,
    error: Option<String>,
) -> ProbeOutcome {
    ProbeOutcome {
        task: task.name.clone(),
        method: task.method.to_uppercase(),
        path: task.path.clone(),
        tracked_name: header_str(headers, TRACKEDTEST_NAME),
        traceparent: header_str(headers, TRACEPARENT),
        invocation_id: headers
            .get(TRACKEDTEST_INVOCATION_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        status,
        latency_ms,
        error,
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn print_text_report(report: &ProbeReport) {
    println!(
        "Probing {} -> {} (suite {})\n",
        report.scenario, report.base_url, report.suite
    );

    for probe in &report.probes {
        match (&probe.error, probe.status) {
            (Some(err), _) => println!(
                "\u{2717} {} ({} {}) -> {}",
                probe.task, probe.method, probe.path, err
            ),
            (None, Some(status)) => println!(
                "\u{2713} {} ({} {}) -> {} in {}ms",
                probe.task,
                probe.method,
                probe.path,
                status,
                probe.latency_ms.unwrap_or(0)
            ),
            (None, None) => println!(
                "\u{2713} {} ({} {}) -> not sent (dry run)",
                probe.task, probe.method, probe.path
            ),
        }
        println!("    trackedtest.name: {}", probe.tracked_name);
        println!("    traceparent:      {}", probe.traceparent);
        if let Some(ref id) = probe.invocation_id {
            println!("    invocation_id:    {id}");
        }
    }
}
