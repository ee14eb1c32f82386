mod algebra_test;
mod compaction_test;
mod grammar_test;
