//! Spoken-topic dialogue.
//!
//! Three turns collect a topic, a question count and a difficulty. Transcript
//! updates arrive as interim or final results; an utterance is committed on a
//! final result or once the speaker has been silent for [`SILENCE_TIMEOUT`].
//! While a reply is being delivered the dialogue does not listen.

use std::mem;
use std::time::{Duration, Instant};

use log::debug;

use crate::generator::{MAX_QUESTIONS, MIN_QUESTIONS};
use crate::models::Difficulty;

pub const SILENCE_TIMEOUT: Duration = Duration::from_secs(2);
pub const NO_INPUT_TIMEOUT: Duration = Duration::from_secs(15);
pub const REPLY_PAUSE: Duration = Duration::from_millis(600);

const NUMBER_WORDS: [&str; 20] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// Which answer the dialogue is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Topic,
    Count,
    Difficulty,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// Everything the dialogue collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    pub topic: String,
    pub count: usize,
    pub difficulty: Difficulty,
}

pub struct Conversation {
    step: Step,
    topic: Option<String>,
    count: Option<usize>,
    transcript: Vec<Turn>,
    pending: String,
    listening: bool,
    processing: bool,
    closed: bool,
    last_heard: Option<Instant>,
    listening_since: Option<Instant>,
    resume_at: Option<Instant>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            step: Step::Topic,
            topic: None,
            count: None,
            transcript: Vec::new(),
            pending: String::new(),
            listening: false,
            processing: false,
            closed: false,
            last_heard: None,
            listening_since: None,
            resume_at: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// The utterance heard so far but not yet committed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Ask the first question.
    pub fn start(&mut self, now: Instant) {
        if self.closed || !self.transcript.is_empty() {
            return;
        }
        self.say(prompt_for(self.step), now);
    }

    /// Feed a transcript update. Returns the collected request once the last
    /// answer has been committed.
    pub fn on_transcript(&mut self, text: &str, is_final: bool, now: Instant) -> Option<TopicRequest> {
        if self.closed || !self.listening || self.processing {
            return None;
        }

        self.pending = text.to_string();
        if is_final {
            return self.commit(now);
        }
        self.last_heard = Some(now);
        None
    }

    /// Drive the timers.
    pub fn tick(&mut self, now: Instant) -> Option<TopicRequest> {
        if self.closed {
            return None;
        }

        if self.resume_at.is_some_and(|at| now >= at) {
            self.resume_at = None;
            self.processing = false;
            self.listening = true;
            self.listening_since = Some(now);
            self.last_heard = None;
            return None;
        }

        if !self.listening {
            return None;
        }

        if !self.pending.trim().is_empty() {
            if self.last_heard.is_some_and(|heard| now >= heard + SILENCE_TIMEOUT) {
                debug!("Silence timeout, committing {:?}", self.pending);
                return self.commit(now);
            }
        } else if self
            .listening_since
            .is_some_and(|since| now >= since + NO_INPUT_TIMEOUT)
        {
            debug!("Nothing heard during {:?}, asking again", self.step);
            self.say(prompt_for(self.step), now);
        }

        None
    }

    /// Stop listening and drop any pending timers. Nothing is processed
    /// afterwards.
    pub fn close(&mut self) {
        self.closed = true;
        self.listening = false;
        self.pending.clear();
        self.last_heard = None;
        self.listening_since = None;
        self.resume_at = None;
    }

    fn commit(&mut self, now: Instant) -> Option<TopicRequest> {
        if self.processing {
            return None;
        }
        self.processing = true;
        self.listening = false;
        self.last_heard = None;

        let utterance = mem::take(&mut self.pending).trim().to_string();
        if utterance.is_empty() {
            self.processing = false;
            self.listening = true;
            self.listening_since = Some(now);
            return None;
        }

        self.transcript.push(Turn {
            speaker: Speaker::User,
            text: utterance.clone(),
        });

        match self.step {
            Step::Topic => {
                self.topic = Some(utterance);
                self.step = Step::Count;
                self.say(prompt_for(self.step), now);
            }
            Step::Count => match parse_count(&utterance) {
                Some(count) => {
                    self.count = Some(count);
                    self.step = Step::Difficulty;
                    self.say(prompt_for(self.step), now);
                }
                None => self.say(
                    "Sorry, I didn't catch a number. How many questions would you like?".to_string(),
                    now,
                ),
            },
            Step::Difficulty => match parse_difficulty(&utterance) {
                Some(difficulty) => {
                    let topic = self.topic.clone().unwrap_or_default();
                    let count = self.count.unwrap_or(MIN_QUESTIONS);
                    self.step = Step::Done;
                    self.say(
                        format!(
                            "Great! Generating {} {} questions about {}.",
                            count, difficulty, topic
                        ),
                        now,
                    );
                    self.resume_at = None;
                    return Some(TopicRequest {
                        topic,
                        count,
                        difficulty,
                    });
                }
                None => self.say("Please say easy, medium or hard.".to_string(), now),
            },
            Step::Done => {}
        }

        None
    }

    fn say(&mut self, text: String, now: Instant) {
        self.listening = false;
        self.listening_since = None;
        self.last_heard = None;
        self.transcript.push(Turn {
            speaker: Speaker::Assistant,
            text,
        });
        self.resume_at = Some(now + REPLY_PAUSE);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_for(step: Step) -> String {
    match step {
        Step::Topic => "What topic would you like to be quizzed on?",
        Step::Count => "How many questions would you like? (1-20)",
        Step::Difficulty => "What difficulty: easy, medium or hard?",
        Step::Done => "Your quiz is on its way.",
    }
    .to_string()
}

/// Read a question count from digits or English number words.
pub fn parse_count(text: &str) -> Option<usize> {
    let lowered = text.to_lowercase();

    let digits: String = lowered
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if !digits.is_empty() {
        // Only overflow can fail here, and that is above the maximum anyway.
        let count = digits.parse::<usize>().unwrap_or(MAX_QUESTIONS);
        return Some(count.clamp(MIN_QUESTIONS, MAX_QUESTIONS));
    }

    words(&lowered)
        .find_map(|word| NUMBER_WORDS.iter().position(|w| *w == word))
        .map(|index| index + 1)
}

/// Read a difficulty from a free-form answer.
pub fn parse_difficulty(text: &str) -> Option<Difficulty> {
    let lowered = text.to_lowercase();

    // The last difficulty named wins.
    words(&lowered).filter_map(difficulty_word).last()
}

fn difficulty_word(word: &str) -> Option<Difficulty> {
    match word {
        "easy" | "simple" | "beginner" => Some(Difficulty::Easy),
        "medium" | "normal" | "moderate" | "intermediate" => Some(Difficulty::Medium),
        "hard" | "difficult" | "advanced" | "expert" => Some(Difficulty::Hard),
        _ => None,
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Start a dialogue and wait out the first reply pause.
    fn listening_conversation() -> (Conversation, Instant) {
        let mut conversation = Conversation::new();
        let t0 = Instant::now();
        conversation.start(t0);
        let now = t0 + REPLY_PAUSE;
        conversation.tick(now);
        assert!(conversation.is_listening());
        (conversation, now)
    }

    fn answer(conversation: &mut Conversation, text: &str, now: Instant) -> (Option<TopicRequest>, Instant) {
        let result = conversation.on_transcript(text, true, now);
        let resumed = now + REPLY_PAUSE;
        conversation.tick(resumed);
        (result, resumed)
    }

    #[test]
    fn test_full_dialogue() {
        let (mut conversation, now) = listening_conversation();
        assert_eq!(conversation.step(), Step::Topic);

        let (result, now) = answer(&mut conversation, "the solar system", now);
        assert!(result.is_none());
        assert_eq!(conversation.step(), Step::Count);

        let (result, now) = answer(&mut conversation, "let's do eight", now);
        assert!(result.is_none());
        assert_eq!(conversation.step(), Step::Difficulty);

        let (result, _) = answer(&mut conversation, "Hard please", now);
        assert_eq!(
            result,
            Some(TopicRequest {
                topic: "the solar system".to_string(),
                count: 8,
                difficulty: Difficulty::Hard,
            })
        );
        assert_eq!(conversation.step(), Step::Done);
        assert!(!conversation.is_listening());
    }

    #[test]
    fn test_not_listening_during_reply_pause() {
        let mut conversation = Conversation::new();
        let t0 = Instant::now();
        conversation.start(t0);

        assert!(conversation.on_transcript("ignored", true, t0).is_none());
        assert_eq!(conversation.step(), Step::Topic);
        assert_eq!(conversation.pending(), "");
    }

    #[test]
    fn test_silence_timeout_commits_interim_result() {
        let (mut conversation, now) = listening_conversation();
        conversation.on_transcript("ancient", false, now);
        conversation.on_transcript("ancient rome", false, now + Duration::from_millis(500));

        let before = now + Duration::from_millis(500) + SILENCE_TIMEOUT - Duration::from_millis(1);
        conversation.tick(before);
        assert_eq!(conversation.step(), Step::Topic);

        conversation.tick(now + Duration::from_millis(500) + SILENCE_TIMEOUT);
        assert_eq!(conversation.step(), Step::Count);
        assert_eq!(conversation.transcript().last().unwrap().speaker, Speaker::Assistant);
    }

    #[test]
    fn test_final_result_and_silence_timer_commit_once() {
        let (mut conversation, now) = listening_conversation();
        let final_at = now + SILENCE_TIMEOUT - Duration::from_millis(1);
        conversation.on_transcript("volcanoes", false, now);
        conversation.on_transcript("volcanoes", true, final_at);

        // The silence timer armed by the interim result expires here.
        conversation.tick(now + SILENCE_TIMEOUT);
        conversation.on_transcript("volcanoes", true, now + SILENCE_TIMEOUT);

        let user_turns = conversation
            .transcript()
            .iter()
            .filter(|turn| turn.speaker == Speaker::User)
            .count();
        assert_eq!(user_turns, 1);
        assert_eq!(conversation.step(), Step::Count);
    }

    #[test]
    fn test_invalid_answers_are_asked_again() {
        let (mut conversation, now) = listening_conversation();
        let (_, now) = answer(&mut conversation, "chemistry", now);
        let (_, now) = answer(&mut conversation, "a few", now);
        assert_eq!(conversation.step(), Step::Count);

        let (_, now) = answer(&mut conversation, "12", now);
        assert_eq!(conversation.step(), Step::Difficulty);

        let (result, _) = answer(&mut conversation, "surprise me", now);
        assert!(result.is_none());
        assert_eq!(conversation.step(), Step::Difficulty);
    }

    #[test]
    fn test_no_input_repeats_question() {
        let (mut conversation, now) = listening_conversation();
        let turns = conversation.transcript().len();

        conversation.tick(now + NO_INPUT_TIMEOUT);
        assert_eq!(conversation.transcript().len(), turns + 1);
        assert_eq!(
            conversation.transcript().last().unwrap().text,
            prompt_for(Step::Topic)
        );
        assert!(!conversation.is_listening());
    }

    #[test]
    fn test_close_stops_processing() {
        let (mut conversation, now) = listening_conversation();
        conversation.on_transcript("geology", false, now);
        conversation.close();

        assert!(conversation.is_closed());
        assert!(conversation.tick(now + SILENCE_TIMEOUT).is_none());
        assert!(conversation.on_transcript("geology", true, now).is_none());
        assert_eq!(conversation.step(), Step::Topic);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("10"), Some(10));
        assert_eq!(parse_count("maybe 7 questions"), Some(7));
        assert_eq!(parse_count("Five"), Some(5));
        assert_eq!(parse_count("twenty"), Some(20));
        assert_eq!(parse_count("50"), Some(MAX_QUESTIONS));
        assert_eq!(parse_count("0"), Some(MIN_QUESTIONS));
        assert_eq!(parse_count("lots"), None);
        assert_eq!(parse_count("99999999999999999999999"), Some(MAX_QUESTIONS));
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(parse_difficulty("Easy"), Some(Difficulty::Easy));
        assert_eq!(parse_difficulty("normal I guess"), Some(Difficulty::Medium));
        assert_eq!(parse_difficulty("make it difficult"), Some(Difficulty::Hard));
        assert_eq!(parse_difficulty("whatever"), None);
        assert_eq!(parse_difficulty("not easy, make it hard"), Some(Difficulty::Hard));
        assert_eq!(parse_difficulty("something about hardware"), None);
        assert_eq!(parse_difficulty("uneasy"), None);
    }
}
