use pilgen_core::pil::builder::Circuit;

pub mod fib;

/// Every circuit the CLI can emit, in listing order.
pub fn circuits() -> Vec<Box<dyn Circuit>> {
    vec![Box::new(fib::Fib), Box::new(fib::FibViaBuilder)]
}

pub fn find(name: &str) -> Option<Box<dyn Circuit>> {
    circuits().into_iter().find(|circuit| circuit.name() == name)
}
