/// Lets the first call of a burst through and drops every call until
/// `limit_ms` has elapsed. Dropped calls are never replayed.
#[derive(Clone, Debug)]
pub struct Throttle {
    limit_ms: f64,
    window_ends_at: Option<f64>,
}

impl Throttle {
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms: f64::from(limit_ms),
            window_ends_at: None,
        }
    }

    pub fn admit(&mut self, now_ms: f64) -> bool {
        if let Some(window_ends_at) = self.window_ends_at {
            if now_ms < window_ends_at {
                return false;
            }
        }

        self.window_ends_at = Some(now_ms + self.limit_ms);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Outcome of [`Debounce::trigger`]: arm a timer for `wait_ms` that hands
/// `ticket` back to [`Debounce::expire`], and run `run_now` immediately if set.
#[derive(Debug)]
pub struct Triggered<A> {
    pub ticket: Ticket,
    pub wait_ms: u32,
    pub run_now: Option<A>,
}

#[derive(Clone, Debug)]
struct Pending<A> {
    ticket: Ticket,
    args: A,
}

/// Runs once a quiet period of `wait_ms` follows the last trigger, with that
/// trigger's arguments. In `immediate` mode the first trigger of a burst runs
/// at once and the trailing run is suppressed.
#[derive(Clone, Debug)]
pub struct Debounce<A> {
    wait_ms: u32,
    immediate: bool,
    issued: u64,
    pending: Option<Pending<A>>,
}

impl<A: Clone> Debounce<A> {
    pub fn new(wait_ms: u32, immediate: bool) -> Self {
        Self {
            wait_ms,
            immediate,
            issued: 0,
            pending: None,
        }
    }

    pub fn trigger(&mut self, args: A) -> Triggered<A> {
        let call_now = self.immediate && self.pending.is_none();

        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(Pending {
            ticket,
            args: args.clone(),
        });

        Triggered {
            ticket,
            wait_ms: self.wait_ms,
            run_now: call_now.then_some(args),
        }
    }

    /// Called when the timer armed for `ticket` fires. Superseded tickets
    /// return `None` and leave the newer countdown untouched.
    pub fn expire(&mut self, ticket: Ticket) -> Option<A> {
        if self.pending.as_ref().map(|pending| pending.ticket) != Some(ticket) {
            return None;
        }

        let pending = self.pending.take()?;
        if self.immediate {
            None
        } else {
            Some(pending.args)
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
