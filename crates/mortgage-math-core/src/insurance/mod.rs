pub mod cmhc;
pub mod down_payment;
