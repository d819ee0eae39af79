use chrono::Datelike;

/// AOSP license comment placed at the top of generated files.
pub fn license_header(year: i32) -> String {
    format!(
        "<!--\n\
Copyright (C) {} The Android Open Source Project\n\
\n   Licensed under the Apache License, Version 2.0 (the \"License\");\n    \
you may not use this file except in compliance with the License.\n    \
You may obtain a copy of the License at\n\
\n         http://www.apache.org/licenses/LICENSE-2.0\n\
\n    Unless required by applicable law or agreed to in writing, software\n    \
distributed under the License is distributed on an \"AS IS\" BASIS,\n    \
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.\n    \
See the License for the specific language governing permissions and\n    \
limitations under the License.\n\
-->\n",
        year
    )
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn prepend_header(content: &str, year: i32) -> String {
    let mut output = license_header(year);
    output.push_str(content);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = license_header(2015);
        assert!(header.starts_with("<!--\nCopyright (C) 2015 The Android Open Source Project\n\n"));
        assert!(header.contains("\n   Licensed under the Apache License, Version 2.0 (the \"License\");\n"));
        assert!(header.contains("\n    you may not use this file except in compliance with the License.\n"));
        assert!(header.contains("\n         http://www.apache.org/licenses/LICENSE-2.0\n\n"));
        assert!(header.ends_with("    limitations under the License.\n-->\n"));
    }

    #[test]
    fn test_prepend_is_pure_prefix() {
        let body = "<vector/>\n";
        let output = prepend_header(body, 2024);
        assert_eq!(output, format!("{}{}", license_header(2024), body));
        assert!(output.ends_with(body));
    }

    #[test]
    fn test_current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
