//! Companion replies.
//!
//! A [`Responder`] owns the live-call budget. Each message either spends one
//! unit of budget on a live provider or is answered by the local keyword
//! tables. Live failures of any kind land on the local tables too, so the
//! companion always says something.

use std::sync::Arc;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::model::chat::Persona;
use crate::ops::live::LiveCallError;

/// Anything that can turn a user message into a reply.
pub trait ResponseProvider: Send + Sync {
    fn reply(&self, message: &str, persona: Persona) -> Result<String, LiveCallError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Chance of a personal aside when no keyword matches.
const PERSONAL_SHARE_CHANCE: f64 = 0.3;

/// What the local heuristic recognised in a message, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Thanks,
    Goodbye,
    Compliment,
    SelfDescription,
    Help,
    Joke,
    MoodQuery,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::Greeting,
        Intent::Thanks,
        Intent::Goodbye,
        Intent::Compliment,
        Intent::SelfDescription,
        Intent::Help,
        Intent::Joke,
        Intent::MoodQuery,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Intent::Greeting => &["hello", "hi", "hey", "good morning", "good evening", "howdy"],
            Intent::Thanks => &["thanks", "thank you", "thx", "appreciate"],
            Intent::Goodbye => &["bye", "goodbye", "see you", "later", "good night"],
            Intent::Compliment => &["awesome", "amazing", "great", "love you", "you're cool", "smart"],
            Intent::SelfDescription => &["who are you", "your name", "what are you", "about you"],
            Intent::Help => &["help", "how do i", "stuck", "advice", "tips"],
            Intent::Joke => &["joke", "funny", "laugh", "make me smile"],
            Intent::MoodQuery => &["how are you", "how's it going", "how do you feel", "you ok"],
        }
    }
}

/// Case-insensitive substring alternation of the intent's keywords.
fn intent_pattern(intent: Intent) -> String {
    let alternatives: Vec<String> = intent.keywords().iter().map(|k| regex::escape(k)).collect();
    format!(r"(?i)(?:{})", alternatives.join("|"))
}

fn intent_lines(intent: Intent, persona: Persona) -> &'static [&'static str] {
    match (intent, persona) {
        (Intent::Greeting, Persona::Female) => &[
            "Hey you! The clock is behaving oddly today, but I'm here.",
            "Hi there! Ready to make a few minutes feel like hours?",
            "Hello! I saved you a seat in the time stream.",
        ],
        (Intent::Greeting, Persona::Male) => &[
            "Yo! Good to see you. The minutes have been waiting.",
            "Hey hey! Let's bend some time.",
            "Hello, friend. The hourglass says hi too.",
        ],
        (Intent::Thanks, Persona::Female) => &[
            "Anytime. That's what companions are for.",
            "You're welcome! Now back to the good stuff.",
            "Aw, thank you for saying thanks.",
        ],
        (Intent::Thanks, Persona::Male) => &[
            "No problem at all.",
            "Happy to help. Go crush it.",
            "You got it, boss.",
        ],
        (Intent::Goodbye, Persona::Female) => &[
            "See you soon! I'll keep the seconds warm.",
            "Bye for now. Be kind to your future self.",
            "Take care! Come back when the clock gets weird again.",
        ],
        (Intent::Goodbye, Persona::Male) => &[
            "Later! Don't let the deadlines bite.",
            "Catch you on the next lap around the clock.",
            "Peace out. Stay focused.",
        ],
        (Intent::Compliment, Persona::Female) => &[
            "Stop it, you'll make my pixels blush.",
            "Right back at you. Seriously.",
            "That just made my whole timeline.",
        ],
        (Intent::Compliment, Persona::Male) => &[
            "Ha, thanks! You're not so bad yourself.",
            "I try. Mostly I just watch clocks.",
            "Flattery will get you extra focus points.",
        ],
        (Intent::SelfDescription, Persona::Female) => &[
            "I'm Luna, a focus companion who lives slightly outside of time.",
            "Luna here. I help you focus and occasionally philosophise about clocks.",
            "Think of me as a friendly voice between your pomodoros.",
        ],
        (Intent::SelfDescription, Persona::Male) => &[
            "I'm Max. Part coach, part sidekick, fully made of text.",
            "The name's Max. I keep you company while time does weird things.",
            "Just a companion who really likes countdowns.",
        ],
        (Intent::Help, Persona::Female) => &[
            "Try a short Light session. Fifteen minutes, no pressure.",
            "Pick the smallest next step and only do that one.",
            "If the timer starts melting, take a breath and lower the distortion.",
        ],
        (Intent::Help, Persona::Male) => &[
            "Break it down. Then break it down again.",
            "Close the tabs you don't need. All of them. I'll wait.",
            "Start a Flow session and log every distraction. Awareness first.",
        ],
        (Intent::Joke, Persona::Female) => &[
            "Why did the clock get detention? It tocked too much.",
            "I tried to catch some fog earlier. I mist.",
            "Time flies like an arrow. Fruit flies like a banana.",
        ],
        (Intent::Joke, Persona::Male) => &[
            "I'd tell you a time travel joke, but you didn't like it.",
            "Why don't deadlines ever get lonely? Everyone's always thinking about them.",
            "Procrastinators unite! ...tomorrow.",
        ],
        (Intent::MoodQuery, Persona::Female) => &[
            "I'm good! A little dizzy from all the time warping.",
            "Feeling focused. How about you?",
            "Pretty great, now that you're here.",
        ],
        (Intent::MoodQuery, Persona::Male) => &[
            "Doing well. Ticking along.",
            "Can't complain. Well, I could, but I won't.",
            "Solid. Ready for another session?",
        ],
    }
}

fn personal_lines(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Female => &[
            "Confession: I sometimes watch the seconds hand just to relax.",
            "Fun fact about me, I'm terrible at waiting but great at countdowns.",
            "I once tried to finish a to-do list. It grew back.",
        ],
        Persona::Male => &[
            "Between us, I've never once been on time. Occupational hazard.",
            "I used to be a kitchen timer. Long story.",
            "My favourite number is 25. For obvious reasons.",
        ],
    }
}

fn generic_lines(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Female => &[
            "Interesting! Tell me more.",
            "Hmm, I'm thinking about that one.",
            "I hear you. Want to start a session while we chat?",
        ],
        Persona::Male => &[
            "Got it. What's next?",
            "Fair enough.",
            "Huh. Let me chew on that.",
        ],
    }
}

fn pick<R: Rng + ?Sized>(lines: &[&'static str], rng: &mut R) -> String {
    lines.choose(rng).copied().unwrap_or("...").to_string()
}

/// Keyword tables, first match wins.
pub struct LocalResponder {
    intents: IndexMap<Intent, Regex>,
}

impl Default for LocalResponder {
    fn default() -> Self {
        LocalResponder::new()
    }
}

impl LocalResponder {
    pub fn new() -> Self {
        let mut intents = IndexMap::new();
        for intent in Intent::ALL {
            match Regex::new(&intent_pattern(intent)) {
                Ok(re) => {
                    intents.insert(intent, re);
                }
                Err(e) => log::error!("bad keyword pattern for {:?}: {}", intent, e),
            }
        }
        LocalResponder { intents }
    }

    pub fn classify(&self, message: &str) -> Option<Intent> {
        self.intents
            .iter()
            .find(|(_, re)| re.is_match(message))
            .map(|(intent, _)| *intent)
    }

    pub fn reply_with<R: Rng + ?Sized>(&self, message: &str, persona: Persona, rng: &mut R) -> String {
        match self.classify(message) {
            Some(intent) => pick(intent_lines(intent, persona), rng),
            None if rng.gen_bool(PERSONAL_SHARE_CHANCE) => pick(personal_lines(persona), rng),
            None => pick(generic_lines(persona), rng),
        }
    }

    /// Whether `line` could have come out of the local tables for `persona`.
    pub fn is_local_line(line: &str, persona: Persona) -> bool {
        Intent::ALL
            .iter()
            .flat_map(|i| intent_lines(*i, persona).iter())
            .chain(personal_lines(persona))
            .chain(generic_lines(persona))
            .any(|l| *l == line)
    }
}

impl ResponseProvider for LocalResponder {
    fn reply(&self, message: &str, persona: Persona) -> Result<String, LiveCallError> {
        Ok(self.reply_with(message, persona, &mut rand::thread_rng()))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// How the next message will be answered.
pub enum ReplyPlan {
    /// One unit of budget has been spent; ask this provider.
    Live(Arc<dyn ResponseProvider>),
    /// Answered locally, right away.
    Local(String),
}

/// Budget gate in front of an optional live provider.
pub struct Responder {
    live: Option<Arc<dyn ResponseProvider>>,
    local: LocalResponder,
    budget: u32,
    quota_noticed: bool,
}

impl Responder {
    pub fn new(live: Option<Arc<dyn ResponseProvider>>, budget: u32) -> Self {
        Responder {
            live,
            local: LocalResponder::new(),
            budget,
            quota_noticed: false,
        }
    }

    /// No live provider; every reply is local.
    pub fn offline() -> Self {
        Responder::new(None, 0)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn remaining_budget(&self) -> u32 {
        self.budget
    }

    /// Decide how to answer. A live plan has already been charged to the
    /// budget, whether or not the call ends up succeeding.
    pub fn plan(&mut self, message: &str, persona: Persona) -> ReplyPlan {
        match &self.live {
            Some(provider) if self.budget > 0 => {
                self.budget -= 1;
                log::debug!(
                    "live reply via {} ({} calls left)",
                    provider.name(),
                    self.budget
                );
                ReplyPlan::Live(Arc::clone(provider))
            }
            _ => ReplyPlan::Local(self.fallback(message, persona)),
        }
    }

    /// Local answer, used directly or after a failed live call.
    pub fn fallback(&self, message: &str, persona: Persona) -> String {
        self.local.reply_with(message, persona, &mut rand::thread_rng())
    }

    /// Resolve a finished live call: its text, or a local line on failure.
    pub fn settle(&self, result: Result<String, LiveCallError>, message: &str, persona: Persona) -> String {
        match result {
            Ok(text) => text,
            Err(e) => {
                log::warn!("live reply failed, answering locally: {}", e);
                self.fallback(message, persona)
            }
        }
    }

    /// Answer on the calling thread.
    pub fn respond(&mut self, message: &str, persona: Persona) -> String {
        match self.plan(message, persona) {
            ReplyPlan::Live(provider) => {
                let result = provider.reply(message, persona);
                self.settle(result, message, persona)
            }
            ReplyPlan::Local(text) => text,
        }
    }

    /// Once the live budget has run out, a one-time note for the chat.
    pub fn take_quota_notice(&mut self, persona: Persona) -> Option<String> {
        if self.live.is_none() || self.budget > 0 || self.quota_noticed {
            return None;
        }
        self.quota_noticed = true;
        Some(format!(
            "{} has used up the live connection for this session and is answering offline now.",
            persona.name()
        ))
    }
}
