//! NSPasteboard adapter
//!
//! Talks to the general pasteboard through objc message sends. The change
//! count read is a cheap integer fetch, so the 1-second poll never touches
//! payloads unless the counter moved.

use std::ffi::CStr;

use cocoa::base::{id, nil};
use cocoa::foundation::{NSInteger, NSString, NSUInteger};
use objc::runtime::{BOOL, NO};
use objc::{class, msg_send, sel, sel_impl};

use crate::shared::errors::{ClipboardError, ClipboardResult};

use super::{Pasteboard, PasteboardType};

/// UTI for plain text (NSPasteboardTypeString)
const TYPE_STRING: &str = "public.utf8-plain-text";
/// UTI for TIFF image data (NSPasteboardTypeTIFF)
const TYPE_TIFF: &str = "public.tiff";

/// The general NSPasteboard
pub struct MacosPasteboard;

impl MacosPasteboard {
    pub fn general() -> ClipboardResult<Self> {
        unsafe {
            let pasteboard: id = msg_send![class!(NSPasteboard), generalPasteboard];
            if pasteboard == nil {
                return Err(ClipboardError::Pasteboard(
                    "NSPasteboard generalPasteboard unavailable".to_string(),
                ));
            }
        }
        Ok(Self)
    }

    fn pasteboard(&self) -> id {
        unsafe { msg_send![class!(NSPasteboard), generalPasteboard] }
    }

    fn has_type(&self, uti: &str) -> bool {
        unsafe {
            let pasteboard = self.pasteboard();
            let types: id = msg_send![pasteboard, types];
            if types == nil {
                return false;
            }
            let uti_str = NSString::alloc(nil).init_str(uti);
            let contains: BOOL = msg_send![types, containsObject: uti_str];
            let _: () = msg_send![uti_str, release];
            contains != NO
        }
    }
}

impl Pasteboard for MacosPasteboard {
    fn change_count(&self) -> i64 {
        unsafe {
            // changeCount is an NSInteger (i64 on 64-bit)
            let count: NSInteger = msg_send![self.pasteboard(), changeCount];
            count
        }
    }

    fn types(&self) -> Vec<PasteboardType> {
        let mut types = Vec::new();
        if self.has_type(TYPE_STRING) {
            types.push(PasteboardType::Text);
        }
        if self.has_type(TYPE_TIFF) {
            types.push(PasteboardType::Image);
        }
        types
    }

    fn read_text(&self) -> Option<String> {
        unsafe {
            let uti = NSString::alloc(nil).init_str(TYPE_STRING);
            let value: id = msg_send![self.pasteboard(), stringForType: uti];
            let _: () = msg_send![uti, release];
            if value == nil {
                return None;
            }
            let utf8 = value.UTF8String();
            if utf8.is_null() {
                return None;
            }
            Some(CStr::from_ptr(utf8).to_string_lossy().into_owned())
        }
    }

    fn read_image_data(&self) -> Option<Vec<u8>> {
        unsafe {
            let uti = NSString::alloc(nil).init_str(TYPE_TIFF);
            let data: id = msg_send![self.pasteboard(), dataForType: uti];
            let _: () = msg_send![uti, release];
            if data == nil {
                return None;
            }
            let length: NSUInteger = msg_send![data, length];
            if length == 0 {
                return None;
            }
            let bytes: *const u8 = msg_send![data, bytes];
            if bytes.is_null() {
                return None;
            }
            Some(std::slice::from_raw_parts(bytes, length as usize).to_vec())
        }
    }

    fn clear(&self) {
        unsafe {
            let _: NSInteger = msg_send![self.pasteboard(), clearContents];
        }
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        unsafe {
            let pasteboard = self.pasteboard();
            let uti = NSString::alloc(nil).init_str(TYPE_STRING);
            let value = NSString::alloc(nil).init_str(text);
            let written: BOOL = msg_send![pasteboard, setString: value forType: uti];
            let _: () = msg_send![value, release];
            let _: () = msg_send![uti, release];
            if written == NO {
                return Err(ClipboardError::Pasteboard(
                    "NSPasteboard rejected text write".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn write_image_data(&self, data: &[u8]) -> ClipboardResult<()> {
        unsafe {
            let ns_data: id = msg_send![
                class!(NSData),
                dataWithBytes: data.as_ptr()
                length: data.len() as NSUInteger
            ];
            let image: id = msg_send![class!(NSImage), alloc];
            let image: id = msg_send![image, initWithData: ns_data];
            if image == nil {
                return Err(ClipboardError::Pasteboard(
                    "stored image bytes did not decode to an NSImage".to_string(),
                ));
            }

            let objects: id = msg_send![class!(NSArray), arrayWithObject: image];
            let written: BOOL = msg_send![self.pasteboard(), writeObjects: objects];
            let _: () = msg_send![image, release];
            if written == NO {
                return Err(ClipboardError::Pasteboard(
                    "NSPasteboard rejected image write".to_string(),
                ));
            }
        }
        Ok(())
    }
}
