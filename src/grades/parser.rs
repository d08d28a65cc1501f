#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

peg::parser! {
    /// grammars for a single line of a raw grade report.
    pub grammar report() for str {
        /// matches spaces and tabs padding the end of a line
        rule padding() = quiet!{[' ' | '\t' | '\r']*}

        /// matches the spaces skipped after a delimiter
        rule spaces() = quiet!{[' ']*}

        /// matches a finite non-negative decimal number, eg. `8`, `8.0`, `.5`
        rule score() -> f64
            = n:$(['0'..='9']+ ("." ['0'..='9']*)? / "." ['0'..='9']+)
            {?
                n.parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .ok_or("finite non-negative score")
            }

        /// matches exactly one of the delimiter characters
        rule separator(seps: &[char])
            = [c if seps.contains(&c)]

        /// matches everything up to the next delimiter, trimmed
        rule field(seps: &[char]) -> &'input str
            = f:$([c if !seps.contains(&c) && c != '\n']+)
            {?
                let f = f.trim();
                if f.is_empty() { Err("student identifier") } else { Ok(f) }
            }

        /// parses `identifier<delimiter>score`, where the delimiter is any one
        /// of `seps`
        pub rule delimited_record(seps: &[char]) -> (&'input str, f64)
            = id:field(seps) separator(seps) spaces() s:score() padding() ![_]
            { (id, s) }

        /// parses `identifier score`, split on any run of spaces or tabs
        pub rule whitespace_record() -> (&'input str, f64)
            = padding()
              id:$([c if !c.is_whitespace()]+)
              quiet!{[' ' | '\t']+}
              s:score()
              padding()
              ![_]
            { (id, s) }
    }
}
