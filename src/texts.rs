//! Thai message catalog for every user-facing reply.
//!
//! The bot speaks Thai only, so the catalog is a plain constants module
//! rather than a localization engine. Validation re-prompts always state
//! what was wrong and the expected format; no internal error codes leak
//! into chat.

// Signup flow

pub const SIGNUP_NUDGE: &str = "พิมพ์ \"สมัคร\" เพื่อเริ่มลงทะเบียนสมาชิกครับ";
pub const SIGNUP_ASK_NAME: &str =
    "เริ่มลงทะเบียนสมาชิกครับ 📝\nกรุณาพิมพ์ชื่อ-นามสกุลของคุณ";
pub const SIGNUP_ASK_NAME_AGAIN: &str = "กรุณาพิมพ์ชื่อ-นามสกุลใหม่อีกครั้งครับ";
pub const SIGNUP_NAME_TOO_SHORT: &str =
    "ชื่อสั้นเกินไปครับ กรุณาพิมพ์ชื่อ-นามสกุล อย่างน้อย 2 ตัวอักษร";
pub const SIGNUP_ASK_PHONE: &str = "กรุณาพิมพ์เบอร์โทรศัพท์ (ตัวเลข 9-12 หลัก)";
pub const SIGNUP_PHONE_INVALID: &str =
    "เบอร์โทรไม่ถูกต้องครับ กรุณาพิมพ์ตัวเลข 9-12 หลัก เช่น 0891234567";
pub const SIGNUP_ASK_ADDRESS: &str =
    "กรุณาพิมพ์ที่อยู่สำหรับจัดส่งเอกสาร (อย่างน้อย 6 ตัวอักษร)";
pub const SIGNUP_ADDRESS_TOO_SHORT: &str =
    "ที่อยู่สั้นเกินไปครับ กรุณาพิมพ์ที่อยู่อย่างน้อย 6 ตัวอักษร";
pub const SIGNUP_CONFIRM_PROMPT: &str =
    "พิมพ์ \"ยืนยัน\" เพื่อบันทึก หรือ \"แก้ไข\" เพื่อกรอกใหม่";
pub const SIGNUP_DONE: &str =
    "ลงทะเบียนเรียบร้อยแล้วครับ 🎉 พิมพ์ \"จองนัด\" เพื่อนัดเจาะเลือดได้เลย";
pub const SIGNUP_CANCELLED: &str =
    "ยกเลิกการลงทะเบียนแล้วครับ พิมพ์ \"สมัคร\" เมื่อต้องการเริ่มใหม่";
pub const SIGNUP_RESTART: &str =
    "การลงทะเบียนก่อนหน้าเสร็จสิ้นแล้วครับ พิมพ์ \"สมัคร\" เพื่อเริ่มรายการใหม่";

/// Signup summary shown at the confirm step
pub fn signup_summary(name: &str, phone: &str, address: &str) -> String {
    format!(
        "ตรวจสอบข้อมูลการลงทะเบียนครับ\n\n👤 ชื่อ: {name}\n📞 เบอร์โทร: {phone}\n🏠 ที่อยู่: {address}\n\n{SIGNUP_CONFIRM_PROMPT}"
    )
}

// Booking flow

pub const BOOKING_NUDGE: &str = "พิมพ์ \"จองนัด\" เพื่อเริ่มจองคิวเจาะเลือดครับ";
pub const BOOKING_ASK_ADDRESS: &str =
    "เริ่มจองคิวเจาะเลือดครับ 🩸\nกรุณาแชร์ตำแหน่งจากแผนที่ หรือพิมพ์ที่อยู่ที่ให้เจ้าหน้าที่เข้าเจาะเลือด";
pub const BOOKING_ASK_ADDRESS_AGAIN: &str =
    "กรุณาแชร์ตำแหน่ง หรือพิมพ์ที่อยู่ใหม่อีกครั้งครับ";
pub const BOOKING_ADDRESS_TOO_SHORT: &str =
    "ที่อยู่สั้นเกินไปครับ กรุณาพิมพ์อย่างน้อย 6 ตัวอักษร หรือแชร์ตำแหน่งจากแผนที่";
pub const BOOKING_ASK_DATE: &str = "สะดวกให้เข้าเจาะเลือดวันไหนครับ";
pub const BOOKING_DATE_TOO_SHORT: &str =
    "กรุณาระบุวันที่ครับ เช่น \"เร็วที่สุด\" \"วันนี้\" \"พรุ่งนี้\" หรือวันที่แบบ 2026-09-01";
pub const BOOKING_ASK_NOTE: &str =
    "มีหมายเหตุถึงเจ้าหน้าที่ไหมครับ (พิมพ์ \"-\" ถ้าไม่มี)";
pub const BOOKING_CONFIRM_PROMPT: &str =
    "พิมพ์ \"ยืนยัน\" เพื่อจองนัด หรือ \"แก้ไข\" เพื่อกรอกใหม่";
pub const BOOKING_DONE: &str =
    "จองนัดเรียบร้อยแล้วครับ ✅ เจ้าหน้าที่จะติดต่อยืนยันเวลาอีกครั้ง ขอบคุณครับ";
pub const BOOKING_CANCELLED: &str =
    "ยกเลิกการจองแล้วครับ พิมพ์ \"จองนัด\" เมื่อต้องการเริ่มใหม่";
pub const BOOKING_RESTART: &str =
    "การจองก่อนหน้าเสร็จสิ้นแล้วครับ พิมพ์ \"จองนัด\" เพื่อจองรายการใหม่";
pub const BOOKING_NEED_SIGNUP: &str =
    "ขออภัยครับ ต้องลงทะเบียนสมาชิกก่อนจองนัด พิมพ์ \"สมัคร\" เพื่อลงทะเบียน";

// Step hints appended by the router
pub const BOOKING_LOCATION_HINT: &str =
    "💡 แตะปุ่ม + มุมซ้ายล่าง แล้วเลือก Location เพื่อแชร์ตำแหน่งได้เลยครับ";
pub const BOOKING_DATE_HINT: &str =
    "ตัวอย่างคำตอบ: เร็วที่สุด / วันนี้ / พรุ่งนี้ / 2026-09-01";

pub const LOCATION_RECEIVED: &str = "ได้รับตำแหน่งแล้วครับ 📍";

/// Booking summary shown at the confirm step
pub fn booking_summary(date_text: &str, address: &str, note: &str) -> String {
    let note_display = if note.is_empty() { "-" } else { note };
    format!(
        "ตรวจสอบรายละเอียดการจองครับ\n\n📅 วันที่นัด: {date_text}\n📍 สถานที่: {address}\n📝 หมายเหตุ: {note_display}\n\n{BOOKING_CONFIRM_PROMPT}"
    )
}

// Welcome / consent

pub const WELCOME: &str =
    "สวัสดีครับ ยินดีต้อนรับสู่บริการเจาะเลือดถึงบ้าน 🩸\nเราให้บริการนัดหมายเจาะเลือดโดยเจ้าหน้าที่ถึงที่พักของคุณ";
pub const CONSENT_QUESTION: &str =
    "ยินยอมให้จัดเก็บข้อมูลส่วนบุคคลเพื่อใช้ในการนัดหมายหรือไม่ครับ";
pub const CONSENT_YES_LABEL: &str = "ยินยอม";
pub const CONSENT_NO_LABEL: &str = "ไม่ยินยอม";
pub const CONSENT_DECLINED: &str =
    "รับทราบครับ หากเปลี่ยนใจสามารถพิมพ์ \"สมัคร\" เพื่อลงทะเบียนได้ทุกเมื่อ";

// Menu / help / fallback

pub const MENU_TITLE: &str = "เมนูหลัก";
pub const MENU_BODY: &str = "เลือกบริการที่ต้องการได้เลยครับ";
pub const MENU_BOOK_LABEL: &str = "จองนัดเจาะเลือด";
pub const MENU_SIGNUP_LABEL: &str = "สมัครสมาชิก";
pub const MENU_DETAILS_LABEL: &str = "ดูนัดของฉัน";
pub const MENU_PROFILE_LABEL: &str = "โปรไฟล์";
pub const QUICK_MENU_LABEL: &str = "เมนู";

pub const HELP_REPLY: &str =
    "รับเรื่องแล้วครับ เจ้าหน้าที่จะติดต่อกลับโดยเร็วที่สุด 🙏\nระหว่างนี้พิมพ์ \"เมนู\" เพื่อกลับสู่เมนูหลักได้ครับ";
pub const FALLBACK_REGISTERED: &str =
    "ขออภัยครับ ไม่เข้าใจข้อความนี้ พิมพ์ \"จองนัด\" เพื่อจองคิว หรือ \"เมนู\" เพื่อดูบริการทั้งหมด";
pub const FALLBACK_GUEST: &str =
    "ขออภัยครับ ไม่เข้าใจข้อความนี้ พิมพ์ \"สมัคร\" เพื่อลงทะเบียน หรือ \"เมนู\" เพื่อดูบริการทั้งหมด";

// Profile / booking details

pub const PROFILE_NOT_FOUND: &str =
    "ยังไม่พบข้อมูลสมาชิกครับ พิมพ์ \"สมัคร\" เพื่อลงทะเบียน";
pub const BOOKING_DETAILS_NONE: &str =
    "ยังไม่มีรายการนัดครับ พิมพ์ \"จองนัด\" เพื่อจองคิวเจาะเลือด";
pub const NO_ACTIVE_BOOKING: &str =
    "ยังไม่มีรายการจองที่แก้ไขได้ครับ พิมพ์ \"จองนัด\" เพื่อเริ่มจองใหม่";

/// Stored profile rendered for the profile_show action
pub fn profile_text(name: &str, phone: &str, address: &str) -> String {
    format!("ข้อมูลสมาชิกของคุณ\n\n👤 ชื่อ: {name}\n📞 เบอร์โทร: {phone}\n🏠 ที่อยู่: {address}")
}

/// Latest booking rendered for the booking_details action
pub fn booking_details_text(date_text: &str, address: &str, note: &str) -> String {
    let note_display = if note.is_empty() { "-" } else { note };
    format!(
        "นัดล่าสุดของคุณ\n\n📅 วันที่นัด: {date_text}\n📍 สถานที่: {address}\n📝 หมายเหตุ: {note_display}"
    )
}

// Forced step edits from the summary card

pub const FORCE_ASK_ADDRESS: &str =
    "กรุณาแชร์ตำแหน่ง หรือพิมพ์ที่อยู่ใหม่ที่ให้เจ้าหน้าที่เข้าเจาะเลือดครับ";
pub const FORCE_ASK_DATE: &str = "ต้องการเปลี่ยนเป็นวันไหนครับ";

// Card button labels

pub const CONFIRM_LABEL: &str = "ยืนยัน";
pub const EDIT_LABEL: &str = "แก้ไข";
pub const EDIT_DATE_LABEL: &str = "แก้ไขวันที่";
pub const EDIT_ADDRESS_LABEL: &str = "แก้ไขที่อยู่";
