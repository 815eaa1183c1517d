use std::time::Instant;

/// Monotonic elapsed-time reader around `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Stopwatch {
        Stopwatch { started: Instant::now() }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn elapses_monotonically() {
        let sw = Stopwatch::start();
        thread::sleep(Duration::from_millis(5));
        let first = sw.elapsed_secs();
        let second = sw.elapsed_secs();
        assert!(first >= 0.005);
        assert!(second >= first);
    }
}
