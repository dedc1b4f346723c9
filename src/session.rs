//! Shared-code session gate. A convenience control, not a security
//! boundary: unlimited retries, no lockout, state lives only as long as the
//! process.

pub struct SessionGate {
    code: String,
    unlocked: bool,
}

impl SessionGate {
    pub fn new(code: &str) -> SessionGate {
        SessionGate {
            code: code.to_string(),
            unlocked: false,
        }
    }

    /// Exact match, case-insensitive. A wrong code leaves the gate locked.
    pub fn login(&mut self, input: &str) -> bool {
        if input.eq_ignore_ascii_case(&self.code) {
            self.unlocked = true;
        }
        self.unlocked
    }

    pub fn logout(&mut self) {
        self.unlocked = false;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive() {
        for attempt in ["bears", "BEARS", "BeArS"] {
            let mut gate = SessionGate::new("BEARS");
            assert!(gate.login(attempt), "{attempt} should unlock");
            assert!(gate.is_unlocked());
        }
    }

    #[test]
    fn wrong_code_leaves_gate_locked() {
        let mut gate = SessionGate::new("BEARS");
        assert!(!gate.login("LIONS"));
        assert!(!gate.is_unlocked());
        // Unlimited retries; a later correct code still works.
        assert!(gate.login("bears"));
    }

    #[test]
    fn logout_relocks() {
        let mut gate = SessionGate::new("BEARS");
        gate.login("bears");
        gate.logout();
        assert!(!gate.is_unlocked());
    }
}
