//! # Render Scheduling
//!
//! Decides when a frame is drawn. The cube animates and redraws every loop
//! iteration; the terrain is static and only redraws when something changed.

/// How frames are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw every iteration of the event loop
    Continuous,
    /// Draw only after a render has been requested
    OnDemand,
}

/// Tracks whether a frame is owed.
///
/// Requests coalesce: any number of requests before the next frame produce one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderScheduler {
    mode: RenderMode,
    render_requested: bool,
}

impl RenderScheduler {
    /// The first frame is always owed.
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            render_requested: true,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Requests a frame. Returns `true` only for the request that set the flag.
    pub fn request_render_if_not_requested(&mut self) -> bool {
        if self.render_requested {
            return false;
        }
        self.render_requested = true;
        true
    }

    /// Whether the event loop should ask the window for a redraw.
    pub fn should_render(&self) -> bool {
        match self.mode {
            RenderMode::Continuous => true,
            RenderMode::OnDemand => self.render_requested,
        }
    }

    /// Called when a frame is drawn; clears the pending request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::replace(&mut self.render_requested, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_always_owed() {
        let scheduler = RenderScheduler::new(RenderMode::OnDemand);
        assert!(scheduler.should_render());
    }

    #[test]
    fn test_on_demand_coalesces_requests() {
        let mut scheduler = RenderScheduler::new(RenderMode::OnDemand);
        assert!(scheduler.take_render_request());
        assert!(!scheduler.should_render());

        assert!(scheduler.request_render_if_not_requested());
        assert!(!scheduler.request_render_if_not_requested());
        assert!(!scheduler.request_render_if_not_requested());
        assert!(scheduler.should_render());

        assert!(scheduler.take_render_request());
        assert!(!scheduler.take_render_request());
        assert!(!scheduler.should_render());
    }

    #[test]
    fn test_continuous_always_renders() {
        let mut scheduler = RenderScheduler::new(RenderMode::Continuous);
        for _ in 0..3 {
            scheduler.take_render_request();
            assert!(scheduler.should_render());
        }
        assert_eq!(scheduler.mode(), RenderMode::Continuous);
    }
}
