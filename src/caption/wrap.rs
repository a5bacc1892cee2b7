/// Greedy word wrap to at most `width` chars per line. Words longer than `width` are broken.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();
        while !rest.is_empty() {
            let needed = if current.is_empty() {
                rest.len()
            } else {
                current_len + 1 + rest.len()
            };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(rest.iter());
                current_len += rest.len();
                rest.clear();
            } else if current.is_empty() {
                let tail = rest.split_off(width);
                lines.push(rest.iter().collect());
                rest = tail;
            } else {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/caption/wrap.rs"]
mod tests;
