pub mod sculpt_examples;
