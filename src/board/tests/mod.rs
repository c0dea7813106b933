//! Unit tests for the board domain and synchronization service.
