/// Wrap a string into lines of at most `max_chars` characters, breaking at
/// spaces where possible. Width is counted in characters, which is adequate
/// for the Latin and Devanagari text this tool renders.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.chars().count() <= max_chars {
            lines.push(raw_line.to_string());
            continue;
        }

        let mut remaining = raw_line;
        while !remaining.is_empty() {
            if remaining.chars().count() <= max_chars {
                lines.push(remaining.to_string());
                break;
            }

            // Last space within the character budget, and the byte offset
            // where the budget runs out
            let mut break_pos = None;
            let mut budget_end = remaining.len();
            for (count, (pos, ch)) in remaining.char_indices().enumerate() {
                if count == max_chars {
                    budget_end = pos;
                    break;
                }
                if ch == ' ' {
                    break_pos = Some(pos);
                }
            }

            match break_pos {
                Some(pos) if pos > 0 => {
                    lines.push(remaining[..pos].to_string());
                    remaining = remaining[pos + 1..].trim_start();
                }
                _ => {
                    lines.push(remaining[..budget_end].to_string());
                    remaining = &remaining[budget_end..];
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
