//! Whole-fixture scan covering every vulnerability category at once.

#![allow(clippy::unwrap_used)]

use vigil::engine::{Engine, ScanOptions, UnitInput};
use vigil::registry::{Category, Registry};

const FIXTURE: &str = r#"import hashlib
import os
import pickle
import random
import subprocess
import xml.etree.ElementTree as ET

API_KEY = "9fA7k2LmQ0pZxWv4TnB8cJd6"

def get_user(cursor, username):
    query = f"SELECT * FROM users WHERE name = '{username}'"
    cursor.execute(query)
    return cursor.fetchone()

def ping(hostname):
    os.system(f"ping -c 4 {hostname}")

def read_upload(request):
    filename = request.args.get("file")
    with open(filename, "r") as f:
        return f.read()

def fetch(request):
    url = request.args.get("url")
    return requests.get(url)

def restore(session_data):
    return pickle.loads(session_data)

def parse_report(xml_payload):
    return ET.fromstring(xml_payload)

def digest(data):
    return hashlib.md5(data).hexdigest()

def make_session_token():
    return random.randint(100000, 999999)

def cleanup():
    try:
        os.remove("/tmp/scratch")
    except Exception:
        pass

event_log = []

def record(event):
    event_log.append(event)
"#;

fn scan_fixture() -> vigil::aggregate::ScanReport {
    let engine = Engine::new(Registry::builtin().unwrap());
    let units = vec![UnitInput::Content {
        id: "backend.py".to_owned(),
        raw: FIXTURE.as_bytes().to_vec(),
    }];
    engine.scan(&units, &ScanOptions::default())
}

#[test]
fn every_category_in_the_fixture_is_detected() {
    let report = scan_fixture();
    let categories: Vec<Category> = report.findings.iter().map(|f| f.category).collect();

    for expected in [
        Category::HardcodedSecret,
        Category::InjectionSql,
        Category::InjectionCommand,
        Category::PathTraversal,
        Category::Ssrf,
        Category::InsecureDeserialization,
        Category::Xxe,
        Category::WeakCrypto,
        Category::InsecureRandomness,
        Category::ExceptionSwallowing,
        Category::ResourceLeak,
    ] {
        assert!(
            categories.contains(&expected),
            "missing {}: got {categories:?}",
            expected.as_str()
        );
    }
}

#[test]
fn findings_are_ranked_and_well_formed() {
    let report = scan_fixture();
    assert!(!report.findings.is_empty());

    for pair in report.findings.windows(2) {
        assert!(pair[0].severity >= pair[1].severity);
        if pair[0].severity == pair[1].severity {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    for finding in &report.findings {
        assert!(!finding.fingerprint.is_empty());
        assert!(finding.line >= 1);
        assert!(finding.column >= 1);
        assert!((0.0..=1.0).contains(&finding.confidence));
    }
}

#[test]
fn fingerprints_are_unique_within_the_report() {
    let report = scan_fixture();
    let mut fingerprints: Vec<&str> = report
        .findings
        .iter()
        .map(|f| f.fingerprint.as_str())
        .collect();
    fingerprints.sort_unstable();
    let before = fingerprints.len();
    fingerprints.dedup();
    assert_eq!(before, fingerprints.len());
}
