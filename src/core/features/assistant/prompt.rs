/// Prompt asking the model for a result line followed by a short explanation.
pub fn conversion_prompt(query: &str) -> String {
    format!(
        "Convert this unit with detailed explanation: {}\n\
         Use this format:\n\
         **Conversion Result**\n\
         [value] [from unit] = [converted value] [to unit]\n\
         **Explanation**\n\
         [brief explanation in simple terms]",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = conversion_prompt("5 feet to meters");
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Convert this unit with detailed explanation: 5 feet to meters",
                "Use this format:",
                "**Conversion Result**",
                "[value] [from unit] = [converted value] [to unit]",
                "**Explanation**",
                "[brief explanation in simple terms]",
            ]
        );
    }
}
