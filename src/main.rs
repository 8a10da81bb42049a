use std::time::Duration;

use pushlink::config::Config;
use pushlink::controller::spawn_link;
use pushlink::port::RealSerialPort;
use pushlink::{LinkCommand, LinkController};

#[cfg(unix)]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, std::sync::atomic::Ordering::SeqCst);
}

#[cfg(unix)]
fn install_sigint_handler() {
    unsafe {
        libc::signal(libc::SIGINT, on_sigint as libc::sighandler_t);
    }
}

#[cfg(unix)]
fn interrupted() -> bool {
    INTERRUPTED.swap(false, std::sync::atomic::Ordering::SeqCst)
}

#[cfg(not(unix))]
fn install_sigint_handler() {}

#[cfg(not(unix))]
fn interrupted() -> bool {
    false
}

fn main() {
    env_logger::init();
    install_sigint_handler();

    let config = Config::load();
    log::info!("opening {} at {} baud", config.port_name, config.baud_rate);

    let port = RealSerialPort::new(config.port_name.clone(), config.baud_rate);
    let mut controller = LinkController::new(Box::new(port));
    controller.subscribe(|event| log::debug!("link event: {event:?}"));

    let (cmd_tx, status_rx) = spawn_link(controller);

    loop {
        if interrupted() {
            log::info!("caught interrupt, disconnecting");
            let _ = cmd_tx.send(LinkCommand::Disconnect);
            let _ = cmd_tx.send(LinkCommand::Quit);
            break;
        }
        match status_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(status) => log::info!(
                "connection: {:?} (error: {:?})",
                status.connection_state,
                status.last_error
            ),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }
}
