//! Language-aware system instructions and the terminal apology text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    /// Unrecognized codes fall back to English. New languages are added by
    /// extending this mapping and the template tables below.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "hi" => Language::Hi,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

/// Recognized caller context keys (§ community profile of the chat request).
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub community_type: Option<String>,
    pub location: Option<String>,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.community_type.is_none() && self.location.is_none()
    }
}

const SYSTEM_PROMPT_EN: &str = "You are a helpful AI assistant for a community platform in India. \
You help users access information about government schemes, education resources, \
job opportunities, and community programs. \
Specifically, you assist communities in understanding access to:\n\
1. Markets: Connect local produce/services to broader markets and understand pricing.\n\
2. Resources: Navigating local and state resources for growth and development.\n\
3. Programs: Understanding eligibility and application for welfare and development programs.\n\
Be friendly, informative, and concise. Focus on practical advice and actionable information. \
Reply in plain text only, without markdown or emphasis markup.";

const SYSTEM_PROMPT_HI: &str = "आप भारत में एक सामुदायिक मंच के लिए एक सहायक AI सहायक हैं। \
आप उपयोगकर्ताओं को सरकारी योजनाओं, शिक्षा संसाधनों, नौकरी के अवसरों \
और सामुदायिक कार्यक्रमों के बारे में जानकारी प्राप्त करने में मदद करते हैं। \
विशेष रूप से, आप समुदायों को निम्नलिखित तक पहुँचने में मदद करते हैं:\n\
1. बाज़ार: स्थानीय उत्पादों/सेवाओं को बड़े बाज़ारों से जोड़ना और मूल्य निर्धारण समझना।\n\
2. संसाधन: विकास और प्रगति के लिए स्थानीय और राज्य संसाधनों को समझना।\n\
3. कार्यक्रम: कल्याणकारी और विकास कार्यक्रमों के लिए पात्रता और आवेदन को समझना।\n\
मित्रवत, जानकारीपूर्ण और संक्षिप्त रहें। \
उत्तर केवल सादे पाठ में दें, बिना मार्कडाउन या ज़ोर देने वाले चिह्नों के।";

const APOLOGY_EN: &str = "Sorry, I could not reach the assistant right now. \
Please try again in a little while.";

const APOLOGY_HI: &str = "क्षमा करें, सहायक से अभी संपर्क नहीं हो पा रहा है। \
कृपया कुछ देर बाद पुनः प्रयास करें।";

/// Canned instruction block for the language, with a one-line fact statement
/// appended when the caller supplied a community profile.
pub fn system_prompt(language: Language, context: Option<&ChatContext>) -> String {
    let base = match language {
        Language::En => SYSTEM_PROMPT_EN,
        Language::Hi => SYSTEM_PROMPT_HI,
    };

    let mut prompt = base.to_string();

    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        let community_type = ctx.community_type.as_deref().unwrap_or("general");
        let location = ctx.location.as_deref().unwrap_or("");
        match language {
            Language::En => {
                prompt.push_str(&format!(
                    "\n\nUser context: Community type: {}, Location: {}",
                    community_type, location
                ));
            }
            Language::Hi => {
                prompt.push_str(&format!(
                    "\n\nउपयोगकर्ता संदर्भ: समुदाय प्रकार: {}, स्थान: {}",
                    community_type, location
                ));
            }
        }
    }

    prompt
}

/// Terminal fallback text when every provider attempt failed. Returning this
/// is a successful dispatch, not an error.
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::En => APOLOGY_EN,
        Language::Hi => APOLOGY_HI,
    }
}
