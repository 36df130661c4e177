use super::prelude::{Profiler, LOG_CAPACITY};

fn operations(profiler: &Profiler) -> Vec<String> {
    profiler.logs()
        .map(|entry| entry.operation.clone())
        .collect()
}

#[test]
fn test_logs_in_order() {
    let mut profiler = Profiler::new();

    profiler.log("declare");
    profiler.log_details("call", "add(1, 2)");
    profiler.log("return");

    assert_eq!(operations(&profiler), vec!["declare", "call", "return"]);

    let details = profiler.logs()
        .map(|entry| entry.details.as_deref())
        .collect::<Vec<_>>();

    assert_eq!(details, vec![None, Some("add(1, 2)"), None]);
}

#[test]
fn test_eviction_keeps_latest() {
    let mut profiler = Profiler::new();

    for i in 0..=LOG_CAPACITY {
        profiler.log(format!("op{i}"));
    }

    let logs = operations(&profiler);

    assert_eq!(logs.len(), LOG_CAPACITY);
    assert_eq!(logs.first().map(String::as_str), Some("op1"));
    assert_eq!(logs.last().map(String::as_str), Some("op1000"));

    let expected = (1..=LOG_CAPACITY)
        .map(|i| format!("op{i}"))
        .collect::<Vec<_>>();

    assert_eq!(logs, expected);
}

#[test]
fn test_reading_is_restartable() {
    let mut profiler = Profiler::with_capacity(2);

    profiler.log("a");
    profiler.log("b");
    profiler.log("c");

    assert_eq!(operations(&profiler), vec!["b", "c"]);
    assert_eq!(operations(&profiler), vec!["b", "c"]);
    assert_eq!(profiler.len(), 2);
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut profiler = Profiler::with_capacity(0);

    profiler.log("dropped");

    assert!(profiler.is_empty());
}
