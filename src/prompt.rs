use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout; an empty answer picks `default`, or asks
/// again when there is none. End of input counts as "no".
pub fn confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    confirm_with(prompt, default, &mut io::stdin().lock(), &mut io::stdout())
}

fn confirm_with(prompt: &str, default: Option<bool>, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        line.clear();
        match default {
            Some(true) => write!(output, "{prompt} (Y/n): ")?,
            Some(false) | None => write!(output, "{prompt} (y/N): ")?,
        }
        output.flush()?;

        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", Some(false), true)]
    #[case("YES\n", None, true)]
    #[case("n\n", Some(true), false)]
    #[case("\n", Some(true), true)]
    #[case("\n", Some(false), false)]
    #[case("maybe\n\ny\n", None, true)]
    #[case("", None, false)]
    fn test_confirm(#[case] answers: &str, #[case] default: Option<bool>, #[case] expected: bool) {
        let mut output = Vec::new();
        let confirmed = confirm_with("Proceed?", default, &mut answers.as_bytes(), &mut output).unwrap();
        assert_eq!(confirmed, expected);
        assert!(String::from_utf8(output).unwrap().starts_with("Proceed? ("));
    }
}
