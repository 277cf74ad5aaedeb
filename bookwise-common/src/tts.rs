//! Browser speech-synthesis player markup
//!
//! Speech happens entirely in the visitor's browser through
//! `window.speechSynthesis`; the server only emits HTML and a small script.

use crate::text_utils::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const WORDS_PER_MINUTE: f64 = 150.0;

/// (code, label) pairs offered in the voice picker
pub const VOICES: [(&str, &str); 4] = [
    ("en-US", "Default"),
    ("en-GB", "British English"),
    ("en-AU", "Australian English"),
    ("en-IN", "Indian English"),
];

static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub title: String,
    pub voice_lang: String,
    pub rate: f64,
    pub pitch: f64,
    pub show_controls: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            title: "Audio Summary".to_string(),
            voice_lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            show_controls: true,
        }
    }
}

/// Sentences used to drive the progress bar; the whole text when no terminator
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences: Vec<String> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        vec![text.trim().to_string()]
    } else {
        sentences
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Listening time at [`WORDS_PER_MINUTE`], rounded to one decimal
pub fn estimated_minutes(text: &str) -> f64 {
    let minutes = word_count(text) as f64 / WORDS_PER_MINUTE;
    (minutes * 10.0).round() / 10.0
}

/// JSON string literal safe to place inside a `<script>` element
pub fn script_string(text: &str) -> String {
    let json = serde_json::Value::String(text.to_string()).to_string();
    json.replace("</", "<\\/")
}

fn player_id(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.chars().take(50).collect::<String>().hash(&mut hasher);
    format!("tts_player_{:x}", hasher.finish())
}

/// Full player: title, duration, play/pause/stop, progress, speed and voice
pub fn render_audio_player(text: &str, options: &PlayerOptions) -> String {
    let id = player_id(text);
    let rate = options.rate.clamp(0.5, 2.0);
    let pitch = options.pitch.clamp(0.0, 2.0);
    let voice = if VOICES.iter().any(|(code, _)| *code == options.voice_lang) {
        options.voice_lang.as_str()
    } else {
        "en-US"
    };

    let controls = if options.show_controls {
        let voice_options: String = VOICES
            .iter()
            .map(|(code, label)| {
                let selected = if *code == voice { " selected" } else { "" };
                format!(r#"<option value="{code}"{selected}>{label}</option>"#)
            })
            .collect();
        format!(
            r#"<div class="tts-controls">
    <label>Speed <input type="range" id="{id}_rate" min="0.5" max="2" step="0.1" value="{rate}"></label>
    <label>Voice <select id="{id}_voice">{voice_options}</select></label>
  </div>"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="tts-player" id="{id}">
  <div class="tts-header">
    <span class="tts-icon">🎧</span>
    <div>
      <div class="tts-title">{title}</div>
      <div class="tts-meta">~{minutes} min • {words} words</div>
    </div>
  </div>
  <div class="tts-buttons">
    <button type="button" id="{id}_play">▶ Play</button>
    <button type="button" id="{id}_pause">⏸ Pause</button>
    <button type="button" id="{id}_stop">⏹ Stop</button>
  </div>
  <div class="tts-progress"><div class="tts-bar" id="{id}_bar" style="width:0%"></div></div>
  {controls}
</div>
<script>
(function() {{
  const text = {text_literal};
  const sentences = {sentences_literal};
  const synth = window.speechSynthesis;
  if (!synth) {{
    document.getElementById("{id}_play").disabled = true;
    return;
  }}
  let index = 0;
  let stopped = true;
  const bar = document.getElementById("{id}_bar");
  const rateInput = document.getElementById("{id}_rate");
  const voiceInput = document.getElementById("{id}_voice");
  function speakNext() {{
    if (stopped || index >= sentences.length) {{
      if (index >= sentences.length) {{ bar.style.width = "100%"; stopped = true; }}
      return;
    }}
    const utterance = new SpeechSynthesisUtterance(sentences[index]);
    utterance.lang = voiceInput ? voiceInput.value : "{voice}";
    utterance.rate = rateInput ? parseFloat(rateInput.value) : {rate};
    utterance.pitch = {pitch};
    utterance.onend = function() {{
      index += 1;
      bar.style.width = Math.round(index / sentences.length * 100) + "%";
      speakNext();
    }};
    synth.speak(utterance);
  }}
  document.getElementById("{id}_play").onclick = function() {{
    if (synth.paused) {{ synth.resume(); return; }}
    if (!stopped) return;
    stopped = false;
    speakNext();
  }};
  document.getElementById("{id}_pause").onclick = function() {{ synth.pause(); }};
  document.getElementById("{id}_stop").onclick = function() {{
    stopped = true;
    index = 0;
    synth.cancel();
    bar.style.width = "0%";
  }};
  void text;
}})();
</script>"#,
        title = escape_html(&options.title),
        minutes = estimated_minutes(text),
        words = word_count(text),
        text_literal = script_string(text),
        sentences_literal = script_sentences(text),
    )
}

/// Single "Listen" button reading the whole text
pub fn render_mini_player(text: &str, label: &str) -> String {
    let id = player_id(text);
    format!(
        r#"<button type="button" class="tts-mini" id="{id}_mini">🔊 {label}</button>
<script>
(function() {{
  const text = {text_literal};
  const button = document.getElementById("{id}_mini");
  if (!window.speechSynthesis) {{ button.disabled = true; return; }}
  button.onclick = function() {{
    window.speechSynthesis.cancel();
    window.speechSynthesis.speak(new SpeechSynthesisUtterance(text));
  }};
}})();
</script>"#,
        label = escape_html(label),
        text_literal = script_string(text),
    )
}

fn script_sentences(text: &str) -> String {
    let json = serde_json::Value::from(split_sentences(text)).to_string();
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("First one. Second! Third?"),
            vec!["First one.", "Second!", "Third?"]
        );
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
    }

    #[test]
    fn test_estimated_minutes() {
        let text = vec!["word"; 300].join(" ");
        assert_eq!(word_count(&text), 300);
        assert_eq!(estimated_minutes(&text), 2.0);

        let short = vec!["word"; 100].join(" ");
        assert_eq!(estimated_minutes(&short), 0.7);
    }

    #[test]
    fn test_script_string_escapes_closing_tags_and_quotes() {
        let literal = script_string(r#"He said "hi" </script><b>"#);
        assert!(!literal.contains("</script>"));
        assert!(literal.contains(r#"\"hi\""#));
        assert!(literal.starts_with('"') && literal.ends_with('"'));
    }

    #[test]
    fn test_player_clamps_rate_and_pitch() {
        let html = render_audio_player(
            "Hello there.",
            &PlayerOptions {
                rate: 5.0,
                pitch: -1.0,
                ..Default::default()
            },
        );
        assert!(html.contains(r#"value="2""#));
        assert!(html.contains("utterance.pitch = 0;"));
        assert!(html.contains("~0 min • 2 words"));
    }

    #[test]
    fn test_player_unknown_voice_defaults() {
        let html = render_audio_player(
            "Hi.",
            &PlayerOptions {
                voice_lang: "fr-FR".into(),
                ..Default::default()
            },
        );
        assert!(html.contains(r#"<option value="en-US" selected>"#));
    }

    #[test]
    fn test_player_escapes_title_and_embeds_text() {
        let html = render_audio_player(
            "Malicious </script> text.",
            &PlayerOptions {
                title: "<b>Title</b>".into(),
                ..Default::default()
            },
        );
        assert!(html.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn test_mini_player() {
        let html = render_mini_player("Read me", "Listen");
        assert!(html.contains("🔊 Listen"));
        assert!(html.contains(r#"const text = "Read me";"#));
    }
}
