// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection prompt template

/// Characters of the prompt included in failure logs
pub const PROMPT_LOG_PREVIEW_CHARS: usize = 200;

/// Build the detection prompt for a user command
///
/// The command is embedded verbatim. The template asks for a bare JSON array
/// of `{box, name, color_hex}` objects with boxes normalized to [0, 1].
pub fn build_detection_prompt(command: &str) -> String {
    format!(
        r##"You are an expert at detecting objects in images, filtering the results according to the user's instruction, and returning precise bounding box coordinates as JSON.

[User instruction (the most important condition)]: "{command}"

[Requirements]:
1. Detect the objects in the image and select ONLY those that match the user's instruction (color and object).
2. Output each object's bounding box in normalized image coordinates (0.0 to 1.0) as an array in the form `[x_min, y_min, x_max, y_max]`.
3. Output the dominant color of each detected object as a hex code (e.g. #FF0000).
4. The output MUST be a single JSON array that follows the schema below. Do not include any other text or explanation.

JSON schema:
[
  {{"box": [0.1, 0.2, 0.3, 0.4], "name": "...", "color_hex": "#RRGGBB"}},
  ...
]
"##
    )
}

/// The first `max_chars` characters of a prompt, for logging
pub fn prompt_preview(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((end, _)) => &prompt[..end],
        None => prompt,
    }
}
