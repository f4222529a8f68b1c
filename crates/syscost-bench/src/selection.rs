//! Parsing of command-line selections.

use syscost::Operation;

/// Parse a comma-separated operation list.
///
/// Each item is an operation name (file stem, process name or short alias),
/// a numeric benchmark type from 1 to 7, or `all`/`0` for every operation.
/// Duplicates are dropped; the run order is fixed regardless.
pub fn parse_operations(input: &str) -> Result<Vec<Operation>, String> {
    let mut selected = Vec::new();

    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let operations: Vec<Operation> = if item.eq_ignore_ascii_case("all") || item == "0" {
            Operation::ALL.to_vec()
        } else if let Ok(kind) = item.parse::<u8>() {
            let operation = Operation::from_benchmark_type(kind)
                .ok_or_else(|| format!("unknown benchmark type {} (expected 0-7)", kind))?;
            vec![operation]
        } else {
            let operation = Operation::by_name(item)
                .ok_or_else(|| format!("unknown operation '{}'", item))?;
            vec![operation]
        };

        for operation in operations {
            if !selected.contains(&operation) {
                selected.push(operation);
            }
        }
    }

    if selected.is_empty() {
        return Err("no operations given".to_string());
    }
    Ok(selected)
}

/// Parse a comma-separated list of positive counts.
///
/// Accepts plain integers, `_` separators and integral scientific notation
/// such as `1e6`.
pub fn parse_list(input: &str) -> Result<Vec<usize>, String> {
    let values = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_count)
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err("empty list".to_string());
    }
    Ok(values)
}

fn parse_count(item: &str) -> Result<usize, String> {
    let cleaned = item.replace('_', "");
    if let Ok(value) = cleaned.parse::<usize>() {
        return Ok(value);
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 => {
            Ok(value as usize)
        }
        _ => Err(format!("'{}' is not a non-negative integer", item)),
    }
}
