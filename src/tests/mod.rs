// Test modules for ctxlog crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on behavior verification.

// Test helper utilities (recording sinks and capture buffers)
pub mod helpers;

// Core unit tests
pub mod closer;
pub mod fanout;

// NOTE: Fatal exit and cross-thread/task scenarios live in the integration
// tests (tests/), since they need a child process or a full runtime
