//! `${VAR}` placeholders in raw config text.

/// Replace `${VAR}` and `${VAR:-fallback}` placeholders with environment
/// values before the text is parsed.
///
/// Unset variables without a fallback and unterminated placeholders are kept
/// verbatim, so `RelayChatConfig::validate` can still report them.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let placeholder = &rest[start..];
        let Some(end) = placeholder.find('}') else {
            out.push_str(placeholder);
            return out;
        };

        let body = &placeholder[2..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };
        let value = match (lookup(name), fallback) {
            _ if name.is_empty() => None,
            (Some(v), Some(f)) if v.is_empty() => Some(f.to_string()),
            (Some(v), _) => Some(v),
            (None, f) => f.map(str::to_string),
        };
        match value {
            Some(value) => out.push_str(&value),
            None => out.push_str(&placeholder[..=end]),
        }
        rest = &placeholder[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "BOT_ID" => Some("bot-42".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn reads_process_env() {
        unsafe { std::env::set_var("RELAYCHAT_TEST_VAR", "hello") };
        assert_eq!(substitute_env("key=${RELAYCHAT_TEST_VAR}"), "key=hello");
        unsafe { std::env::remove_var("RELAYCHAT_TEST_VAR") };
    }

    #[test]
    fn replaces_every_placeholder() {
        assert_eq!(
            substitute_with("a=${BOT_ID} b=${BOT_ID}!", fake_env),
            "a=bot-42 b=bot-42!"
        );
    }

    #[test]
    fn unset_var_is_kept() {
        assert_eq!(
            substitute_with("token = \"${MISSING}\"", fake_env),
            "token = \"${MISSING}\""
        );
    }

    #[test]
    fn fallback_applies_when_unset_or_empty() {
        assert_eq!(substitute_with("${MISSING:-dflt}", fake_env), "dflt");
        assert_eq!(substitute_with("${EMPTY:-dflt}", fake_env), "dflt");
        assert_eq!(substitute_with("${BOT_ID:-dflt}", fake_env), "bot-42");
        assert_eq!(substitute_with("${EMPTY}", fake_env), "");
    }

    #[test]
    fn malformed_placeholders_are_literal() {
        assert_eq!(substitute_with("token=${BROKEN", fake_env), "token=${BROKEN");
        assert_eq!(substitute_with("x=${}", fake_env), "x=${}");
        assert_eq!(substitute_with("cost: $5 {ok}", fake_env), "cost: $5 {ok}");
    }
}
