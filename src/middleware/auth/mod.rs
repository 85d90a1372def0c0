pub mod account_gate;
