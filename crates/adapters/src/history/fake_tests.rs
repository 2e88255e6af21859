// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;

fn sessions() -> Vec<HistorySession> {
    (1..=3)
        .rev()
        .map(|d| HistorySession::new(NaiveDate::from_ymd_opt(2026, 4, d).unwrap(), vec![]))
        .collect()
}

#[tokio::test]
async fn fake_history_returns_configured_sessions() {
    let adapter = FakeHistoryAdapter::new();
    adapter.set_history("squat", sessions());

    let found = adapter
        .lookup(Some("c1"), &ExerciseRef::Id("squat".to_string()), 2)
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let none = adapter
        .lookup(None, &ExerciseRef::Name("Squat".to_string()), 5)
        .await
        .unwrap();
    assert!(none.is_empty());

    let calls = adapter.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].client_id.as_deref(), Some("c1"));
    assert_eq!(calls[1].limit, 5);
}

#[tokio::test]
async fn fake_history_failure() {
    let adapter = FakeHistoryAdapter::new();
    adapter.set_failing(true);
    let result = adapter
        .lookup(None, &ExerciseRef::Id("squat".to_string()), 5)
        .await;
    assert!(matches!(result, Err(HistoryError::Unavailable(_))));
}
