// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqsplice-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsplice and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;

use similar::{Algorithm, TextDiff};

use crate::batch::DiffRenderer;

const CONTEXT_LINES: usize = 3;

/// Unified diff of one file with `a/` and `b/` headers. Empty when the texts are equal.
pub fn unified_diff(path: &Path, original: &str, updated: &str) -> String {
    if original == updated {
        return String::new();
    }
    let name = path.display().to_string();
    let old_header = format!("a/{name}");
    let new_header = format!("b/{name}");
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, updated);
    diff.unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&old_header, &new_header)
        .to_string()
}

/// [`DiffRenderer`] backed by [`unified_diff`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedDiff;

impl DiffRenderer for UnifiedDiff {
    fn render(&self, path: &Path, original: &str, updated: &str) -> String {
        unified_diff(path, original, updated)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::unified_diff;

    #[test]
    fn renders_headers_hunk_and_context() {
        let diff = unified_diff(
            Path::new("flows/login.puml"),
            "a\nb\nc\n",
            "a\nb\nx\nc\n",
        );
        assert_eq!(
            diff,
            "--- a/flows/login.puml\n+++ b/flows/login.puml\n@@ -1,3 +1,4 @@\n a\n b\n+x\n c\n"
        );
    }

    #[test]
    fn identical_texts_have_no_diff() {
        assert_eq!(unified_diff(Path::new("x.puml"), "a\n", "a\n"), "");
    }
}
