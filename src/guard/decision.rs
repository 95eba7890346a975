/// Outcome of classifying a single file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Allowed,
    /// Human-readable reason naming the offending path.
    Blocked(String),
}

impl Classification {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Classification::Blocked(_))
    }
}

/// Signal handed back to the host tool's hook runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

impl Verdict {
    /// Exit status understood by the host: 0 proceeds, 2 blocks the tool call.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Allow => 0,
            Verdict::Deny(_) => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Allow => "ALLOW",
            Verdict::Deny(_) => "DENY",
        }
    }

    /// Line written to stderr when the write is denied.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny(reason) => Some(format!("BLOCKED: {reason}")),
        }
    }
}

impl From<Classification> for Verdict {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Allowed => Verdict::Allow,
            Classification::Blocked(reason) => Verdict::Deny(reason),
        }
    }
}
