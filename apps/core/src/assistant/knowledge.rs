//! Knowledge base for the help assistant.
//!
//! Two ordered tables drive the matcher: phrases, tried first, and single
//! keywords that reuse a phrase's response. Declaration order is significant.

use serde::{Deserialize, Serialize};

/// Greetings shown when a conversation starts.
const GREETINGS: &[&str] = &[
    "Hello! I'm ACEE Assistant. How can I help you today?",
    "Hi there! I'm here to help with your academic questions.",
    "Welcome! I can assist you with the student portal and academic topics.",
];

/// Phrase table, in match order.
const RESPONSES: &[(&str, &str)] = &[
    // Portal navigation
    ("how to add course", "To add a course: 1) Go to the Courses section, 2) Fill in the course name, 3) Click 'Add Course'. The course will appear in your dashboard!"),
    ("add assignment", "To add an assignment: 1) Navigate to Assignments, 2) Enter title, select course, and due date, 3) Click 'Add Assignment'. You can track its progress there!"),
    ("check grades", "You can view your grades in the Dashboard under 'Performance by Course' or in the specific Assignments/Exams sections where you can input grades."),
    ("dashboard", "The Dashboard shows your academic overview including total courses, pending assignments, overall average, and upcoming deadlines."),
    ("delete course", "To delete a course: Find the course card and click the 'Delete Course' button. Warning: This will also delete all related assignments and exams!"),
    ("update status", "To update assignment status: Go to Assignments, find your assignment, and use the dropdown to change status between 'To Do', 'In Progress', or 'Completed'."),
    // Academic help
    ("study tips", "Here are some study tips: 1) Create a study schedule, 2) Break large topics into smaller chunks, 3) Use active recall, 4) Take regular breaks, 5) Form study groups!"),
    ("time management", "Effective time management: 1) Prioritize tasks using the urgent/important matrix, 2) Use the Pomodoro technique, 3) Set specific goals, 4) Avoid multitasking, 5) Track your progress!"),
    ("exam preparation", "Exam prep strategy: 1) Review material regularly, 2) Create summary notes, 3) Practice with past papers, 4) Form study groups, 5) Get enough sleep before exams!"),
    ("assignment tips", "Assignment success tips: 1) Start early, 2) Understand requirements, 3) Create an outline, 4) Research thoroughly, 5) Proofread carefully, 6) Submit before deadline!"),
    ("note taking", "Effective note-taking: 1) Use the Cornell method, 2) Write in your own words, 3) Use abbreviations and symbols, 4) Review and revise notes regularly, 5) Use colors for organization!"),
    ("reading strategies", "Better reading: 1) Preview the material first, 2) Ask questions while reading, 3) Take breaks every 20-30 minutes, 4) Summarize each section, 5) Connect new info to what you know!"),
    // Motivation and wellness
    ("motivation", "Stay motivated by: 1) Setting clear goals, 2) Celebrating small wins, 3) Visualizing success, 4) Finding your 'why', 5) Surrounding yourself with positive influences!"),
    ("stress management", "Manage stress with: 1) Deep breathing exercises, 2) Regular exercise, 3) Adequate sleep, 4) Time for hobbies, 5) Talking to friends or counselors when needed."),
    ("balance", "Work-life balance tips: 1) Set boundaries, 2) Schedule downtime, 3) Stay organized, 4) Don't overcommit, 5) Practice self-care regularly!"),
    ("procrastination", "Beat procrastination: 1) Break tasks into smaller steps, 2) Use the 2-minute rule, 3) Remove distractions, 4) Set deadlines, 5) Reward yourself for completing tasks!"),
    ("focus", "Improve focus: 1) Find your optimal environment, 2) Use the Pomodoro technique, 3) Eliminate distractions, 4) Take regular breaks, 5) Stay hydrated and eat well!"),
    // Technical help
    ("login issues", "For login problems: 1) Check your email format, 2) Ensure all fields are filled, 3) Try refreshing the page, 4) Clear browser cache if needed."),
    ("data not saving", "If data isn't saving: 1) Check that the data directory is writable, 2) Restart the application, 3) Check the logs for storage errors, 4) Make sure enough disk space is available."),
    ("navigation", "Navigation help: Use the top menu to switch between Dashboard, Courses, Assignments, and Exams. Each section has its own features and forms."),
    ("performance charts", "The Dashboard shows performance charts with your grades by course. Green bars indicate good performance, while shorter bars suggest areas for improvement!"),
    // Greetings
    ("hello", "Hello! I'm ACEE Assistant, your academic companion. I can help you with the portal, study tips, and academic advice. What would you like to know?"),
    ("hi", "Hi there! Ready to boost your academic performance? I can help with navigation, study strategies, or any questions about the portal!"),
    ("help", "I'm here to help! I can assist with: 📚 Portal navigation, 🎯 Study tips, 📊 Understanding your dashboard, ⏰ Time management, 💪 Motivation, and more!"),
    ("thanks", "You're welcome! I'm always here to help you succeed academically. Feel free to ask me anything else!"),
    ("goodbye", "Goodbye! Keep up the great work with your studies. I'll be here whenever you need academic support! 🎓"),
];

/// Keyword table: keyword -> phrase whose response is reused.
const KEYWORDS: &[(&str, &str)] = &[
    ("course", "how to add course"),
    ("assignment", "add assignment"),
    ("grade", "check grades"),
    ("study", "study tips"),
    ("exam", "exam preparation"),
    ("time", "time management"),
    ("stress", "stress management"),
    ("motivation", "motivation"),
    ("help", "navigation"),
    ("login", "login issues"),
];

const QUICK_REPLIES: &[&str] = &[
    "How to add a course?",
    "Study tips",
    "Exam preparation",
    "Time management",
    "Dashboard help",
    "Assignment tips",
    "Stress management",
    "Note taking",
    "Motivation tips",
    "Performance charts",
];

const FALLBACKS: &[&str] = &[
    "I'm not sure about that, but I can help you with course management, study tips, or using the portal features!",
    "That's interesting! I specialize in academic help and portal navigation. What would you like to know?",
    "I might not have that specific information, but I can assist with assignments, courses, exams, or study strategies!",
];

/// A single `pattern -> response` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Lowercase substring to look for.
    pub pattern: String,
    pub response: String,
}

impl Rule {
    pub fn new(pattern: &str, response: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            response: response.to_string(),
        }
    }
}

/// Fixed tables driving the intent matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    phrases: Vec<Rule>,
    keywords: Vec<Rule>,
    fallbacks: Vec<String>,
    greetings: Vec<String>,
    quick_replies: Vec<String>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let mut builder = KnowledgeBaseBuilder::new();
        for (phrase, response) in RESPONSES {
            builder = builder.phrase(phrase, response);
        }
        for (keyword, phrase) in KEYWORDS {
            builder = builder.keyword(keyword, phrase);
        }
        builder
            .fallbacks(FALLBACKS)
            .greetings(GREETINGS)
            .quick_replies(QUICK_REPLIES)
            .build()
    }
}

impl KnowledgeBase {
    pub fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::new()
    }

    /// Phrase rules in declared order.
    pub fn phrases(&self) -> &[Rule] {
        &self.phrases
    }

    /// Keyword rules in declared order.
    pub fn keywords(&self) -> &[Rule] {
        &self.keywords
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    /// Response mapped to an exact phrase, if declared.
    pub fn response_for(&self, phrase: &str) -> Option<&str> {
        self.phrases
            .iter()
            .find(|rule| rule.pattern == phrase)
            .map(|rule| rule.response.as_str())
    }

    /// Opening message of a conversation.
    pub fn greeting(&self) -> &str {
        self.greetings
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The first `count` suggested prompts.
    pub fn quick_replies(&self, count: usize) -> &[String] {
        &self.quick_replies[..count.min(self.quick_replies.len())]
    }
}

/// Builds a [`KnowledgeBase`], preserving insertion order.
#[derive(Debug, Default)]
pub struct KnowledgeBaseBuilder {
    phrases: Vec<Rule>,
    keywords: Vec<(String, String)>,
    fallbacks: Vec<String>,
    greetings: Vec<String>,
    quick_replies: Vec<String>,
}

impl KnowledgeBaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phrase(mut self, phrase: &str, response: &str) -> Self {
        self.phrases.push(Rule::new(phrase, response));
        self
    }

    /// Maps `keyword` to the response of an already declared `phrase`.
    pub fn keyword(mut self, keyword: &str, phrase: &str) -> Self {
        self.keywords
            .push((keyword.to_lowercase(), phrase.to_lowercase()));
        self
    }

    pub fn fallbacks(mut self, fallbacks: &[&str]) -> Self {
        self.fallbacks = fallbacks.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn greetings(mut self, greetings: &[&str]) -> Self {
        self.greetings = greetings.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn quick_replies(mut self, replies: &[&str]) -> Self {
        self.quick_replies = replies.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Resolves keyword targets. Keywords pointing at an undeclared phrase are dropped.
    pub fn build(self) -> KnowledgeBase {
        let phrases = self.phrases;
        let keywords = self
            .keywords
            .into_iter()
            .filter_map(|(keyword, target)| {
                let resolved = phrases.iter().find(|rule| rule.pattern == target);
                if resolved.is_none() {
                    tracing::warn!(%keyword, %target, "Keyword points at an unknown phrase, skipping");
                }
                resolved.map(|rule| Rule {
                    pattern: keyword,
                    response: rule.response.clone(),
                })
            })
            .collect();

        KnowledgeBase {
            phrases,
            keywords,
            fallbacks: self.fallbacks,
            greetings: self.greetings,
            quick_replies: self.quick_replies,
        }
    }
}
