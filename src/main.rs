extern crate lysander;

use std::process::exit;
use lysander::uci;

fn main() {
    exit(match uci::run() {
        Ok(_) => 0,
        Err(_) => 1,
    })
}
