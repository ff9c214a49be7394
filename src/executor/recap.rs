use crate::models::ExecutionResult;

const RECAP_HEADER: &str = "PLAY RECAP";
const WARNING_PREFIX: &str = "[WARNING]:";

/// Sums the per-host counters printed after `PLAY RECAP`.
pub fn parse_recap(output: &str) -> ExecutionResult {
    let mut result = ExecutionResult::default();
    let mut in_recap = false;

    for line in output.lines() {
        let line = line.trim();
        if line.starts_with(RECAP_HEADER) {
            in_recap = true;
            continue;
        }
        if !in_recap || !line.contains("ok=") {
            continue;
        }

        for token in line.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            let Ok(value) = value.parse::<i32>() else {
                continue;
            };
            let counter = match key {
                "ok" => &mut result.ok,
                "changed" => &mut result.changed,
                "unreachable" => &mut result.unreachable,
                "failed" => &mut result.failed,
                "skipped" => &mut result.skipped,
                "rescued" => &mut result.rescued,
                "ignored" => &mut result.ignored,
                _ => continue,
            };
            *counter = counter.saturating_add(value);
        }
    }

    result
}

pub fn collect_warnings(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(WARNING_PREFIX))
        .map(|warning| warning.trim().to_string())
        .filter(|warning| !warning.is_empty())
        .collect()
}
