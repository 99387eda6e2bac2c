use std::process;

use nudi_core::{Direction, RuleTable};

use super::read_file;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn rules_export(direction: Direction) {
    print!("{}", direction.default_json());
}

pub fn rules_validate(direction: Direction, file: &str) {
    let content = die!(read_file(file), "Error reading rules: {}");
    let table = die!(RuleTable::from_json(&content, direction), "Error: {}");
    println!("OK: {}", summary(&table));
    if let Some(w) = unreachable_keys_warning(&table) {
        eprintln!("warning: {w}");
    }
}

/// Forward keys longer than `maxTokenLength` can never be matched.
fn unreachable_keys_warning(table: &RuleTable) -> Option<String> {
    let longest = table.tokens.max_key_len();
    (table.direction == Direction::Forward && longest > table.max_token_length).then(|| {
        format!(
            "longest tokenMapping key has {longest} chars but maxTokenLength is {}",
            table.max_token_length
        )
    })
}

fn summary(table: &RuleTable) -> String {
    format!(
        "{} rules, {} mappings (longest key {}), maxTokenLength={}, {} post fixups",
        table.direction,
        table.tokens.len(),
        table.tokens.max_key_len(),
        table.max_token_length,
        table.post_fixups.len()
    )
}
