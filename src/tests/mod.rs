// notesync test infrastructure
//
// Unit tests for small pure helpers live next to the code they test. The
// modules here exercise whole components against in-memory fakes and real
// temp directories.

pub mod helpers;

pub mod workspace_tests;
