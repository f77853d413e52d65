//! Speech Output
//!
//! Reads the character and example sentence aloud. Only one utterance plays
//! at a time: callers cancel whatever is speaking before starting the next.

use parking_lot::Mutex;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Default text-to-speech command
pub const DEFAULT_SPEECH_COMMAND: &str = "espeak-ng";

/// Default speaking rate (1.0 = normal)
pub const DEFAULT_SPEECH_RATE: f32 = 0.8;

/// Locale used for everything the tutor speaks
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// espeak-ng words per minute at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Errors from the speech service
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The speech command is not installed
    #[error("speech command '{0}' not found")]
    Unavailable(String),

    /// The speech command could not be started
    #[error("failed to start speech: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Text to speak
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    /// What to say
    pub text: String,
    /// BCP 47 locale
    pub locale: String,
    /// Speaking rate (1.0 = normal)
    pub rate: f32,
}

impl Utterance {
    /// Mandarin utterance at the default rate
    pub fn mandarin(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: DEFAULT_LOCALE.to_string(),
            rate: DEFAULT_SPEECH_RATE,
        }
    }

    /// Override the speaking rate
    #[must_use]
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Speech output service
pub trait SpeechSynthesizer: Send + Sync {
    /// Stop anything currently speaking
    fn cancel_all(&self);

    /// Start speaking; returns once playback has started
    ///
    /// # Errors
    ///
    /// Returns an error when playback cannot start.
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

/// Speech through an external TTS command (espeak-ng compatible flags)
pub struct CommandSpeech {
    /// Program to run
    command: String,
    /// Utterance being spoken
    current: Mutex<Option<Child>>,
}

impl CommandSpeech {
    /// Create a speech service that runs `command`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            current: Mutex::new(None),
        }
    }

    /// The program this service runs
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments for one utterance
    fn args_for(utterance: &Utterance) -> Vec<String> {
        let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate.max(0.1)).round() as u32;
        vec![
            "-v".to_string(),
            voice_for(&utterance.locale),
            "-s".to_string(),
            wpm.to_string(),
            "--".to_string(),
            utterance.text.clone(),
        ]
    }
}

impl Default for CommandSpeech {
    fn default() -> Self {
        Self::new(DEFAULT_SPEECH_COMMAND)
    }
}

impl SpeechSynthesizer for CommandSpeech {
    fn cancel_all(&self) {
        if let Some(mut child) = self.current.lock().take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(error = %e, "Speech already finished");
            }
        }
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let child = Command::new(&self.command)
            .args(Self::args_for(utterance))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechError::Unavailable(self.command.clone())
                } else {
                    SpeechError::Spawn(e)
                }
            })?;

        tracing::debug!(text = %utterance.text, locale = %utterance.locale, "Speaking");

        // Replacing the handle drops (and kills) any previous utterance
        *self.current.lock() = Some(child);
        Ok(())
    }
}

/// Speech disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSpeech;

impl SpeechSynthesizer for SilentSpeech {
    fn cancel_all(&self) {}

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        tracing::trace!(text = %utterance.text, "Speech disabled");
        Ok(())
    }
}

/// espeak-ng voice for a locale
fn voice_for(locale: &str) -> String {
    let lower = locale.to_ascii_lowercase();
    match lower.as_str() {
        "zh-cn" | "zh" | "zh-hans" | "cmn" => "cmn".to_string(),
        "zh-tw" | "zh-hant" => "cmn-latn-pinyin".to_string(),
        "zh-hk" | "yue" => "yue".to_string(),
        _ => lower.split('-').next().unwrap_or("en").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandarin_defaults() {
        let u = Utterance::mandarin("猫");
        assert_eq!(u.locale, "zh-CN");
        assert!((u.rate - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_args_for() {
        let args = CommandSpeech::args_for(&Utterance::mandarin("我有一只猫"));
        assert_eq!(args, vec!["-v", "cmn", "-s", "140", "--", "我有一只猫"]);

        let normal = CommandSpeech::args_for(&Utterance::mandarin("猫").with_rate(1.0));
        assert_eq!(normal[3], "175");
    }

    #[test]
    fn test_voice_for() {
        assert_eq!(voice_for("zh-CN"), "cmn");
        assert_eq!(voice_for("zh-HK"), "yue");
        assert_eq!(voice_for("en-US"), "en");
    }

    #[tokio::test]
    async fn test_missing_command_is_unavailable() {
        let speech = CommandSpeech::new("bihua-no-such-tts-command");
        let err = speech.speak(&Utterance::mandarin("猫")).unwrap_err();
        assert!(matches!(err, SpeechError::Unavailable(_)));
        speech.cancel_all();
    }

    #[test]
    fn test_silent_speech() {
        let speech = SilentSpeech;
        speech.cancel_all();
        assert!(speech.speak(&Utterance::mandarin("猫")).is_ok());
    }
}
