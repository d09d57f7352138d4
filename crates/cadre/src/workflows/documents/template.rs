//! Right-to-left HTML pages fed to the PDF renderer.

use std::fmt::Write;

use crate::workflows::decisions::{AppointmentRecord, CommitteeMember, CommitteeRecord};

const STYLE: &str = "body { font-family: 'Amiri', 'Noto Naskh Arabic', serif; margin: 2.5cm; line-height: 1.8; }
h1 { text-align: center; font-size: 20pt; }
h2 { font-size: 14pt; margin-top: 1.2em; }
.meta { text-align: center; margin-bottom: 1.5em; }
table { width: 100%; border-collapse: collapse; margin: 0.8em 0; }
th, td { border: 1px solid #444; padding: 4px 8px; text-align: right; }
.signature { margin-top: 3em; text-align: left; }";

/// Escape text for safe inclusion in element content and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn paragraph(out: &mut String, heading: &str, text: &str) {
    let _ = writeln!(out, "<h2>{heading}</h2>\n<p>{}</p>", escape_html(text));
}

fn member_table(out: &mut String, heading: &str, members: &[&CommitteeMember]) {
    let _ = writeln!(
        out,
        "<h2>{heading}</h2>\n<table>\n<tr><th>الصفة</th><th>الاسم</th><th>الرقم القومي</th><th>الهاتف</th></tr>"
    );
    for member in members {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            member.slot.title(),
            escape_html(&member.name),
            escape_html(&member.national_id),
            escape_html(&member.phone),
        );
    }
    out.push_str("</table>\n");
}

fn signature(out: &mut String, authority: &str, approval: &str) {
    let _ = writeln!(
        out,
        "<div class=\"signature\"><p>{}</p><p>{}</p></div>",
        escape_html(authority),
        escape_html(approval)
    );
}

pub fn committee_page(record: &CommitteeRecord) -> String {
    let decision = &record.decision;
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>قرار تشكيل لجنة الوظائف القيادية</h1>\n<div class=\"meta\">قرار رقم {} بتاريخ {} - محافظة {}</div>",
        escape_html(&decision.decision_number),
        decision.decision_date.format("%Y-%m-%d"),
        escape_html(&record.meta.governorate),
    );
    let _ = writeln!(body, "<p>{}</p>", escape_html(&decision.preamble));

    paragraph(&mut body, "المادة الأولى", &decision.article_one_text);
    let board: Vec<_> = decision.board().collect();
    member_table(&mut body, "أعضاء اللجنة", &board);
    let secretariat: Vec<_> = decision.secretariat().collect();
    member_table(&mut body, "الأمانة الفنية", &secretariat);
    paragraph(&mut body, "المادة الثانية", &decision.article_two_text);
    paragraph(&mut body, "المادة الثالثة: مهام اللجنة", &decision.committee_tasks);
    paragraph(&mut body, "المادة الرابعة", &decision.article_four);
    signature(
        &mut body,
        &decision.competent_authority,
        &decision.authority_approval,
    );

    page(&format!("قرار رقم {}", decision.decision_number), &body)
}

pub fn appointment_page(record: &AppointmentRecord) -> String {
    let decision = &record.decision;
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>قرار تعيين في وظيفة قيادية</h1>\n<div class=\"meta\">قرار رقم {} بتاريخ {} - محافظة {}</div>",
        escape_html(&decision.decision_number),
        decision.decision_date.format("%Y-%m-%d"),
        escape_html(&record.meta.governorate),
    );
    let _ = writeln!(
        body,
        "<table>\n<tr><th>رقم الإعلان</th><td>{}</td></tr>\n<tr><th>كود المرشح</th><td>{}</td></tr>\n</table>",
        escape_html(&decision.announcement_number),
        escape_html(&decision.candidate_code),
    );

    paragraph(&mut body, "المادة الأولى", &decision.article_one_text);
    paragraph(&mut body, "المادة الثانية", &decision.article_two_text);
    paragraph(&mut body, "المادة الثالثة", &decision.article_three_text);
    signature(
        &mut body,
        &decision.competent_authority,
        &decision.authority_approval,
    );

    page(&format!("قرار رقم {}", decision.decision_number), &body)
}

pub fn no_data_page() -> String {
    page(
        "لا توجد بيانات",
        "<h1>لا توجد بيانات متاحة</h1>\n<p>لم يتم إنشاء أي قرار بعد.</p>\n",
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "خطأ",
        &format!(
            "<h1>تعذر إنشاء المستند</h1>\n<p>{}</p>\n",
            escape_html(message)
        ),
    )
}
