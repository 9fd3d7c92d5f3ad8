pub mod thread_advance_timer;
