/// Keyword table consulted in order; the first keyword contained in the message wins.
pub const RESPONSES: [(&str, &str); 9] = [
    (
        "contract",
        "I can help you analyze contracts for potential risks, compliance issues, and key terms. Our AI system reviews clauses, identifies unusual provisions, and provides recommendations. Would you like to upload a contract for analysis?",
    ),
    (
        "legal advice",
        "I provide general legal information and can guide you to relevant resources. For specific legal advice tailored to your situation, I recommend booking a consultation with one of our legal experts. Would you like me to help you schedule a consultation?",
    ),
    (
        "document",
        "Our document analysis service can review various legal documents including contracts, agreements, legal notices, and compliance documents. We identify risks, check for compliance, and provide detailed reports. The service costs ₹100. Would you like to start an analysis?",
    ),
    (
        "risk",
        "Our risk assessment tool evaluates potential legal risks for your business or situation. We analyze your industry, business type, and specific concerns to provide a comprehensive risk profile with recommendations. The assessment costs ₹80. Shall I help you get started?",
    ),
    (
        "consultation",
        "Our legal consultation sessions connect you with experienced lawyers who provide personalized advice backed by AI research. Sessions cost ₹150 and can be scheduled within 24 hours. Would you like to book a consultation?",
    ),
    (
        "pricing",
        "Our services are affordably priced: Document Analysis - ₹100, Risk Assessment - ₹80, Consultation Session - ₹150. All services include detailed reports and recommendations. Which service interests you most?",
    ),
    (
        "security",
        "We use bank-level encryption and security measures to protect your documents and personal information. Your data is never shared with third parties, and all communications are encrypted. Your privacy and security are our top priorities.",
    ),
    (
        "hello",
        "Hello! I'm your AI legal assistant. I can help you with document analysis, risk assessment, legal consultations, and answer questions about our services. How can I assist you today?",
    ),
    (
        "help",
        "I can help you with: 📄 Document Analysis (₹100) - AI-powered legal document review, 🛡️ Risk Assessment (₹80) - Comprehensive legal risk evaluation, 💬 Legal Consultation (₹150) - Expert advice sessions. Which service would you like to know more about?",
    ),
];

pub const DEFAULT_RESPONSE: &str = "I understand you have a legal question. Our AI system can help with document analysis, risk assessment, and connecting you with legal experts. For specific legal matters, I recommend booking a consultation with one of our lawyers. How can I assist you further?";

/// Canned reply for a visitor message. Total: unmatched input gets [`DEFAULT_RESPONSE`].
pub fn respond(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, response)| *response)
        .unwrap_or(DEFAULT_RESPONSE)
}
