//! Rule-based answers from a small multilingual knowledge base

use serde::Serialize;

/// The same text in every supported language
#[derive(Debug, Clone, Copy)]
pub struct Localized {
    pub en: &'static str,
    pub hi: &'static str,
    pub ta: &'static str,
}

impl Localized {
    /// Unknown language codes get English
    pub fn get(&self, language: &str) -> &'static str {
        match language {
            "hi" => self.hi,
            "ta" => self.ta,
            _ => self.en,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub key: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub response: Localized,
}

/// Checked in order; the first topic with a matching keyword wins
pub const TOPICS: &[Topic] = &[
    Topic {
        key: "disease",
        description: "Plant disease diagnosis and treatment",
        keywords: &["disease", "pest", "infection", "spots", "yellowing", "wilting"],
        response: Localized {
            en: "I can help you identify plant diseases. Please upload a photo of the affected plant using our disease detection feature. Common diseases include blight, rust, and fungal infections.",
            hi: "मैं पौधों की बीमारियों की पहचान करने में आपकी मदद कर सकता हूं। कृपया हमारे रोग पहचान सुविधा का उपयोग करके प्रभावित पौधे की तस्वीर अपलोड करें।",
            ta: "செடி நோய்களை அடையாளம் காண நான் உங்களுக்கு உதவ முடியும். எங்கள் நோய் கண்டறிதல் அம்சத்தைப் பயன்படுத்தி பாதிக்கப்பட்ட செடியின் புகைப்படத்தை பதிவேற்றவும்.",
        },
    },
    Topic {
        key: "price",
        description: "Market prices and predictions",
        keywords: &["price", "rate", "market", "sell", "value", "cost"],
        response: Localized {
            en: "I can help you check current market prices and predict future prices. Visit the Price Prediction section for detailed price analysis of various crops.",
            hi: "मैं आपको वर्तमान बाजार मूल्य जांचने और भविष्य की कीमतों का अनुमान लगाने में मदद कर सकता हूं। विभिन्न फसलों के विस्तृत मूल्य विश्लेषण के लिए मूल्य पूर्वानुमान अनुभाग देखें।",
            ta: "தற்போதைய சந்தை விலைகளை சரிபார்க்கவும் எதிர்கால விலைகளை கணிக்கவும் நான் உங்களுக்கு உதவ முடியும். பல்வேறு பயிர்களின் விரிவான விலை பகுப்பாய்வுக்கு விலை முன்னறிவிப்பு பிரிவைப் பார்வையிடவும்.",
        },
    },
    Topic {
        key: "irrigation",
        description: "Water management and irrigation",
        keywords: &["water", "irrigation", "drip", "watering", "rainfall"],
        response: Localized {
            en: "For water management, consider drip irrigation for efficient water use. Water crops early morning or evening. Check soil moisture before watering. The PMKSY scheme provides support for irrigation.",
            hi: "जल प्रबंधन के लिए, कुशल पानी उपयोग के लिए ड्रिप सिंचाई पर विचार करें। सुबह जल्दी या शाम को फसलों को पानी दें। पानी देने से पहले मिट्टी की नमी जांचें।",
            ta: "நீர் மேலாண்மைக்கு, திறமையான நீர் பயன்பாட்டிற்கு சொட்டு நீர் பாசனத்தை பரிசீலிக்கவும். காலை அல்லது மாலை பயிர்களுக்கு நீர் பாய்ச்சவும்.",
        },
    },
    Topic {
        key: "fertilizer",
        description: "Soil health and fertilization",
        keywords: &["fertilizer", "manure", "nutrients", "nitrogen", "organic"],
        response: Localized {
            en: "Use soil health cards to determine nutrient requirements. Apply fertilizers based on soil test reports. Organic options include compost, vermicompost, and green manure. NPK ratios depend on crop type.",
            hi: "पोषक तत्वों की आवश्यकता निर्धारित करने के लिए मृदा स्वास्थ्य कार्ड का उपयोग करें। मिट्टी परीक्षण रिपोर्ट के आधार पर उर्वरक लागू करें। जैविक विकल्पों में खाद, वर्मीकम्पोस्ट शामिल हैं।",
            ta: "ஊட்டச்சத்து தேவைகளை தீர்மானிக்க மண் ஆரோக்கிய அட்டைகளைப் பயன்படுத்தவும். மண் சோதனை அறிக்கைகளின் அடிப்படையில் உரங்களைப் பயன்படுத்தவும்.",
        },
    },
    Topic {
        key: "schemes",
        description: "Government schemes and subsidies",
        keywords: &["scheme", "subsidy", "government", "loan", "support", "yojana"],
        response: Localized {
            en: "Check the Schemes section for government programs like PM-KISAN (₹6000/year), PMFBY (crop insurance), KCC (credit card), and more. I can help you check eligibility.",
            hi: "पीएम-किसान (₹6000/वर्ष), पीएमएफबीवाई (फसल बीमा), केसीसी (क्रेडिट कार्ड) जैसी सरकारी योजनाओं के लिए योजना अनुभाग देखें।",
            ta: "PM-KISAN (₹6000/ஆண்டு), PMFBY (பயிர் காப்பீடு), KCC (கடன் அட்டை) போன்ற அரசாங்க திட்டங்களுக்கு திட்டங்கள் பிரிவைச் சரிபார்க்கவும்.",
        },
    },
    Topic {
        key: "weather",
        description: "Weather and climate information",
        keywords: &["weather", "rain", "temperature", "climate", "season"],
        response: Localized {
            en: "Monitor local weather forecasts regularly. Different crops require different climate conditions. Kharif crops need good monsoon rainfall, while Rabi crops need cooler temperatures.",
            hi: "स्थानीय मौसम पूर्वानुमानों की नियमित निगरानी करें। विभिन्न फसलों को अलग-अलग जलवायु परिस्थितियों की आवश्यकता होती है।",
            ta: "உள்ளூர் வானிலை முன்னறிவிப்புகளை தவறாமல் கண்காணிக்கவும். வெவ்வேறு பயிர்களுக்கு வெவ்வேறு காலநிலை நிலைமைகள் தேவை.",
        },
    },
    Topic {
        key: "seed",
        description: "Seed selection and planting",
        keywords: &["seed", "variety", "hybrid", "planting", "sowing"],
        response: Localized {
            en: "Always use certified seeds from authorized dealers. Choose varieties suitable for your region. Hybrid seeds offer better yield but require proper care. Check seed treatment requirements before sowing.",
            hi: "हमेशा अधिकृत डीलरों से प्रमाणित बीज का उपयोग करें। अपने क्षेत्र के लिए उपयुक्त किस्मों का चयन करें।",
            ta: "அங்கீகரிக்கப்பட்ட விற்பனையாளர்களிடமிருந்து எப்போதும் சான்றளிக்கப்பட்ட விதைகளைப் பயன்படுத்தவும்.",
        },
    },
    Topic {
        key: "organic",
        description: "Organic farming practices",
        keywords: &["organic", "natural", "chemical-free", "bio"],
        response: Localized {
            en: "Organic farming is supported by PKVY scheme (₹50,000/hectare). Use organic manure, biopesticides, and natural farming methods. Certification required for organic label. Market premium available.",
            hi: "जैविक खेती PKVY योजना (₹50,000/हेक्टेयर) द्वारा समर्थित है। जैविक खाद, जैव कीटनाशकों का उपयोग करें।",
            ta: "இயற்கை விவசாயம் PKVY திட்டத்தால் ஆதரிக்கப்படுகிறது (₹50,000/ஹெக்டேர்).",
        },
    },
];

pub const GREETINGS: &[&str] = &["hello", "hi", "hey", "namaste", "vanakkam"];

pub const GREETING: Localized = Localized {
    en: "Hello! I am your agricultural assistant. I can help you with crop diseases, market prices, government schemes, and farming advice. How can I assist you today?",
    hi: "नमस्ते! मैं आपका कृषि सहायक हूं। मैं फसल रोगों, बाजार मूल्यों, सरकारी योजनाओं और खेती सलाह में आपकी मदद कर सकता हूं।",
    ta: "வணக்கம்! நான் உங்கள் விவசாய உதவியாளர். பயிர் நோய்கள், சந்தை விலைகள், அரசு திட்டங்கள் மற்றும் விவசாய ஆலோசனைகளில் நான் உங்களுக்கு உதவ முடியும்.",
};

pub const DEFAULT_HELP: Localized = Localized {
    en: "I can help you with: 1) Plant disease detection, 2) Price predictions, 3) Government schemes, 4) Farming advice, 5) Marketplace. Could you please be more specific about what you need help with?",
    hi: "मैं आपकी मदद कर सकता हूं: 1) पौधों की बीमारी का पता लगाना, 2) मूल्य पूर्वानुमान, 3) सरकारी योजनाएं, 4) खेती की सलाह, 5) बाजार।",
    ta: "நான் உங்களுக்கு உதவ முடியும்: 1) தாவர நோய் கண்டறிதல், 2) விலை கணிப்புகள், 3) அரசு திட்டங்கள், 4) விவசாய ஆலோசனை, 5) சந்தை.",
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        name: "English",
    },
    Language {
        code: "hi",
        name: "हिन्दी (Hindi)",
    },
    Language {
        code: "ta",
        name: "தமிழ் (Tamil)",
    },
];

/// English name of a language code, English for anything unknown
pub fn language_name(code: &str) -> &'static str {
    match code {
        "hi" => "Hindi",
        "ta" => "Tamil",
        _ => "English",
    }
}

fn contains_greeting(message: &str) -> bool {
    message
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| GREETINGS.contains(&word))
}

/// Answer `message` from the knowledge base
pub fn respond(message: &str, language: &str) -> &'static str {
    let message = message.to_lowercase();

    if contains_greeting(&message) {
        return GREETING.get(language);
    }

    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|k| message.contains(k)))
        .map(|topic| topic.response.get(language))
        .unwrap_or_else(|| DEFAULT_HELP.get(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_as_whole_word() {
        assert_eq!(respond("Hello there", "en"), GREETING.en);
        assert_eq!(respond("hi!", "hi"), GREETING.hi);
        assert_eq!(respond("Vanakkam, friend", "ta"), GREETING.ta);
    }

    #[test]
    fn test_greeting_inside_other_words_is_ignored() {
        // "which" and "this" contain "hi"; "they" contains "hey"
        let answer = respond("which fertilizer should they use this year", "en");
        assert_eq!(answer, TOPICS[3].response.en);
    }

    #[test]
    fn test_first_matching_topic_wins() {
        // "organic" is a fertilizer keyword as well as an organic one
        assert_eq!(respond("Is organic farming good?", "en"), TOPICS[3].response.en);
        assert_eq!(respond("Yellowing leaves on my tomato", "en"), TOPICS[0].response.en);
        assert_eq!(respond("what is the market rate for onion", "en"), TOPICS[1].response.en);
    }

    #[test]
    fn test_unknown_language_uses_english() {
        assert_eq!(respond("drip setup", "fr"), TOPICS[2].response.en);
        assert_eq!(respond("xyz", "de"), DEFAULT_HELP.en);
    }

    #[test]
    fn test_default_help() {
        assert_eq!(respond("tell me a joke", "ta"), DEFAULT_HELP.ta);
    }

    #[test]
    fn test_topic_order_and_languages() {
        let keys: Vec<&str> = TOPICS.iter().map(|t| t.key).collect();
        assert_eq!(
            keys,
            vec!["disease", "price", "irrigation", "fertilizer", "schemes", "weather", "seed", "organic"]
        );
        assert_eq!(LANGUAGES.len(), 3);
        assert_eq!(language_name("hi"), "Hindi");
        assert_eq!(language_name("xx"), "English");
    }
}
