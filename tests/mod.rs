mod export_flow;
mod google_sync_mock;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - export_flow: Pointer interactions end to end, from right-click to .ics file
// - google_sync_mock: Mocking the sync endpoint for testing without a real server
