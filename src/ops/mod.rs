pub mod shot_ops;
