//! WebHID transport (browser only)
//!
//! `navigator.hid` is reached through `js_sys::Reflect` so no unstable
//! web-sys bindings are needed.

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::lock::Mutex;
use futures::StreamExt;
use js_sys::{Array, DataView, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::framing::{wrap_apdu, FrameAssembler, PACKET_SIZE};
use super::transport::{LedgerTransport, TransportOpener};
use crate::services::errors::LedgerErrorKind;
use crate::{console_debug, console_info, console_warn};

pub const LEDGER_VENDOR_ID: u16 = 0x2c97;

pub struct WebHidTransport {
    device: JsValue,
    reports: Mutex<UnboundedReceiver<Vec<u8>>>,
    // Must outlive its registration; `close` unregisters it
    on_input_report: Closure<dyn FnMut(JsValue)>,
}

#[async_trait(?Send)]
impl LedgerTransport for WebHidTransport {
    async fn exchange(&self, apdu: &[u8]) -> Result<Vec<u8>, LedgerErrorKind> {
        let mut reports = self.reports.lock().await;

        // Drop reports left over from an interrupted exchange
        while let Ok(Some(_)) = reports.try_next() {}

        for packet in wrap_apdu(apdu, PACKET_SIZE) {
            let data = Uint8Array::from(&packet[..]);
            call_async(&self.device, "sendReport", &[JsValue::from(0), data.into()]).await?;
        }

        let mut assembler = FrameAssembler::new();
        loop {
            let report = reports
                .next()
                .await
                .ok_or(LedgerErrorKind::DeviceDisconnected)?;
            if let Some(message) = assembler.push(&report)? {
                return Ok(message);
            }
        }
    }

    async fn close(&self) {
        if let Err(e) = input_report_listener(&self.device, "removeEventListener", &self.on_input_report) {
            console_warn!("[WebHID] Failed to remove input listener: {}", e);
        }
        if let Err(e) = call_async(&self.device, "close", &[]).await {
            console_warn!("[WebHID] Failed to close device: {}", e);
        }
    }
}

/// Picks an already-authorised Ledger or asks the user to choose one
#[derive(Clone, Default)]
pub struct WebHidOpener;

#[async_trait(?Send)]
impl TransportOpener for WebHidOpener {
    type Transport = WebHidTransport;

    async fn open(&self) -> Result<WebHidTransport, LedgerErrorKind> {
        let hid = navigator_hid()?;

        let device = match first_ledger(call_async(&hid, "getDevices", &[]).await?) {
            Some(device) => device,
            None => {
                console_info!("[WebHID] No authorised device, requesting one");
                first_ledger(call_async(&hid, "requestDevice", &[request_options()?]).await?)
                    .ok_or(LedgerErrorKind::DeviceNotSelected)?
            }
        };

        let opened = Reflect::get(&device, &"opened".into())
            .map(|v| v.as_bool().unwrap_or(false))
            .unwrap_or(false);
        if !opened {
            call_async(&device, "open", &[]).await?;
        }

        let (sender, receiver) = unbounded::<Vec<u8>>();
        let on_input_report = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match report_bytes(&event) {
                Some(bytes) => {
                    let _ = sender.unbounded_send(bytes);
                }
                None => console_warn!("[WebHID] Input report without data"),
            }
        });

        input_report_listener(&device, "addEventListener", &on_input_report)?;

        console_debug!("[WebHID] Device opened");
        Ok(WebHidTransport {
            device,
            reports: Mutex::new(receiver),
            on_input_report,
        })
    }
}

fn navigator_hid() -> Result<JsValue, LedgerErrorKind> {
    let window = web_sys::window().ok_or(LedgerErrorKind::WebHidUnsupported)?;
    let hid = Reflect::get(&window.navigator(), &"hid".into())
        .map_err(|_| LedgerErrorKind::WebHidUnsupported)?;
    if hid.is_undefined() || hid.is_null() {
        return Err(LedgerErrorKind::WebHidUnsupported);
    }
    Ok(hid)
}

fn request_options() -> Result<JsValue, LedgerErrorKind> {
    let filter = Object::new();
    Reflect::set(&filter, &"vendorId".into(), &JsValue::from(LEDGER_VENDOR_ID)).map_err(js_error)?;

    let options = Object::new();
    Reflect::set(&options, &"filters".into(), &Array::of1(&filter)).map_err(js_error)?;
    Ok(options.into())
}

fn first_ledger(devices: JsValue) -> Option<JsValue> {
    let devices: Array = devices.dyn_into().ok()?;
    devices.iter().find(|device| {
        Reflect::get(device, &"vendorId".into())
            .ok()
            .and_then(|v| v.as_f64())
            .map(|id| id as u16 == LEDGER_VENDOR_ID)
            .unwrap_or(false)
    })
}

fn report_bytes(event: &JsValue) -> Option<Vec<u8>> {
    let view: DataView = Reflect::get(event, &"data".into()).ok()?.dyn_into().ok()?;
    let bytes = Uint8Array::new_with_byte_offset_and_length(
        &view.buffer(),
        view.byte_offset() as u32,
        view.byte_length() as u32,
    );
    Some(bytes.to_vec())
}

/// Calls `add`/`removeEventListener("inputreport", handler)` on `device`
fn input_report_listener(
    device: &JsValue,
    registration: &str,
    handler: &Closure<dyn FnMut(JsValue)>,
) -> Result<(), LedgerErrorKind> {
    method(device, registration)?
        .call2(device, &"inputreport".into(), handler.as_ref())
        .map_err(js_error)?;
    Ok(())
}

fn method(target: &JsValue, name: &str) -> Result<Function, LedgerErrorKind> {
    Reflect::get(target, &name.into())
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| LedgerErrorKind::Transport {
            message: format!("{} is not available", name),
        })
}

async fn call_async(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, LedgerErrorKind> {
    let args: Array = args.iter().collect();
    let promise = method(target, name)?.apply(target, &args).map_err(js_error)?;
    JsFuture::from(Promise::from(promise)).await.map_err(js_error)
}

fn js_error(value: JsValue) -> LedgerErrorKind {
    let name = Reflect::get(&value, &"name".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();

    // The picker rejects with NotFoundError when dismissed
    if name == "NotFoundError" {
        return LedgerErrorKind::DeviceNotSelected;
    }
    if name == "NotAllowedError" || name == "SecurityError" {
        return LedgerErrorKind::WebHidUnsupported;
    }

    let message = Reflect::get(&value, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    LedgerErrorKind::Transport { message }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_listener_removed_with_the_same_handler() {
        let device = Object::new();
        let calls = Array::new();
        let record = |kind: &str| {
            let body = format!("this.calls.push(['{}', type, handler]);", kind);
            Function::new_with_args("type, handler", &body)
        };
        Reflect::set(&device, &"calls".into(), &calls).unwrap();
        Reflect::set(&device, &"addEventListener".into(), &record("add")).unwrap();
        Reflect::set(&device, &"removeEventListener".into(), &record("remove")).unwrap();

        let device: JsValue = device.into();
        let handler = Closure::<dyn FnMut(JsValue)>::new(|_: JsValue| {});
        input_report_listener(&device, "addEventListener", &handler).unwrap();
        input_report_listener(&device, "removeEventListener", &handler).unwrap();

        assert_eq!(calls.length(), 2);
        let added = Array::from(&calls.get(0));
        let removed = Array::from(&calls.get(1));
        assert_eq!(added.get(0).as_string().as_deref(), Some("add"));
        assert_eq!(removed.get(0).as_string().as_deref(), Some("remove"));
        assert_eq!(removed.get(1).as_string().as_deref(), Some("inputreport"));
        assert!(Object::is(&added.get(2), &removed.get(2)));
    }
}
